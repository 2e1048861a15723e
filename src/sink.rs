//! Destinations for relayed child output.
//!
//! A session holds one [`Sinks`] pair. The process streams are the default;
//! anything that implements `Write + Send` can stand in for either one.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// Where one child stream ends up.
#[derive(Clone, Default)]
pub enum Sink {
    /// The real process stdout.
    #[default]
    Stdout,
    /// The real process stderr.
    Stderr,
    /// A shared writer.
    Writer(Arc<Mutex<dyn Write + Send>>),
}

impl Sink {
    pub fn writer<W: Write + Send + 'static>(writer: W) -> Self {
        Sink::Writer(Arc::new(Mutex::new(writer)))
    }

    /// Discards everything.
    pub fn null() -> Self {
        Sink::writer(io::sink())
    }

    /// Write a chunk and flush it through.
    pub fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes)?;
                out.flush()
            }
            Sink::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(bytes)?;
                err.flush()
            }
            Sink::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(|poison| poison.into_inner());
                writer.write_all(bytes)?;
                writer.flush()
            }
        }
    }

    /// True for `Stdout` and `Stderr`.
    pub fn is_process_stream(&self) -> bool {
        matches!(self, Sink::Stdout | Sink::Stderr)
    }

    /// Identity comparison: same process stream, or the same shared writer.
    pub fn same_as(&self, other: &Sink) -> bool {
        match (self, other) {
            (Sink::Stdout, Sink::Stdout) | (Sink::Stderr, Sink::Stderr) => true,
            (Sink::Writer(a), Sink::Writer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => write!(f, "Sink::Stdout"),
            Sink::Stderr => write!(f, "Sink::Stderr"),
            Sink::Writer(_) => write!(f, "Sink::Writer(..)"),
        }
    }
}

impl From<CaptureBuffer> for Sink {
    fn from(buffer: CaptureBuffer) -> Self {
        Sink::Writer(buffer.inner)
    }
}

/// The stdout/stderr pair a session relays into.
#[derive(Debug, Clone)]
pub struct Sinks {
    pub stdout: Sink,
    pub stderr: Sink,
}

impl Sinks {
    pub fn new(stdout: Sink, stderr: Sink) -> Self {
        Self { stdout, stderr }
    }

    /// Both sinks are the real process streams, in their usual places.
    pub fn is_process_default(&self) -> bool {
        matches!(self.stdout, Sink::Stdout) && matches!(self.stderr, Sink::Stderr)
    }

    pub fn same_as(&self, other: &Sinks) -> bool {
        self.stdout.same_as(&other.stdout) && self.stderr.same_as(&other.stderr)
    }
}

impl Default for Sinks {
    fn default() -> Self {
        Self {
            stdout: Sink::Stdout,
            stderr: Sink::Stderr,
        }
    }
}

/// An in-memory writer whose contents can be read back while shared.
#[derive(Clone)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<dyn Write + Send>>,
    bytes: Arc<Mutex<Vec<u8>>>,
}

struct SharedVec(Arc<Mutex<Vec<u8>>>);

impl Write for SharedVec {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.0).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn lock(bytes: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    bytes.lock().unwrap_or_else(|poison| poison.into_inner())
}

impl CaptureBuffer {
    pub fn new() -> Self {
        let bytes = Arc::new(Mutex::new(Vec::new()));
        Self {
            inner: Arc::new(Mutex::new(SharedVec(Arc::clone(&bytes)))),
            bytes,
        }
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.bytes)).into_owned()
    }

    pub fn sink(&self) -> Sink {
        Sink::from(self.clone())
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CaptureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureBuffer")
            .field("len", &lock(&self.bytes).len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_buffer_collects_writes() {
        let buffer = CaptureBuffer::new();
        let sink = buffer.sink();
        sink.write_all(b"hello\n").unwrap();
        sink.write_all(b"world\n").unwrap();
        assert_eq!(buffer.contents(), "hello\nworld\n");
    }

    #[test]
    fn default_pair_is_process_streams() {
        let sinks = Sinks::default();
        assert!(sinks.is_process_default());
        assert!(sinks.stdout.is_process_stream());
    }

    #[test]
    fn swapped_process_streams_are_not_default() {
        let sinks = Sinks::new(Sink::Stderr, Sink::Stdout);
        assert!(!sinks.is_process_default());
    }

    #[test]
    fn redirected_pair_is_not_default() {
        let sinks = Sinks::new(CaptureBuffer::new().sink(), Sink::Stderr);
        assert!(!sinks.is_process_default());
    }

    #[test]
    fn same_as_compares_writer_identity() {
        let buffer = CaptureBuffer::new();
        assert!(buffer.sink().same_as(&buffer.sink()));
        assert!(!buffer.sink().same_as(&CaptureBuffer::new().sink()));
        assert!(Sink::Stdout.same_as(&Sink::Stdout));
        assert!(!Sink::Stdout.same_as(&Sink::Stderr));
    }

    #[test]
    fn null_sink_accepts_writes() {
        Sink::null().write_all(b"dropped").unwrap();
    }
}
