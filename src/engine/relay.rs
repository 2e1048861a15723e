//! Line relays from child pipes to sinks.
//!
//! A relay runs until its pipe reports end-of-file. Read errors end the
//! relay quietly: the pipe closing under us is the normal way out. Write
//! errors on the sink are ignored so the pipe keeps draining and the child
//! never blocks on a full buffer.

use crate::sink::Sink;
use std::io::{BufRead, BufReader, Read};

/// Forward every line from `pipe` to `sink`.
pub(super) fn forward<R: Read>(pipe: R, sink: &Sink) {
    for_each_line(pipe, |line| {
        let _ = sink.write_all(line);
    });
}

/// Collect every line from `pipe`.
pub(super) fn collect<R: Read>(pipe: R) -> Vec<u8> {
    let mut captured = Vec::new();
    for_each_line(pipe, |line| captured.extend_from_slice(line));
    captured
}

fn for_each_line<R: Read>(pipe: R, mut f: impl FnMut(&[u8])) {
    let mut reader = BufReader::new(pipe);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => f(&line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CaptureBuffer;

    #[test]
    fn collect_keeps_line_endings() {
        let captured = collect(&b"one\ntwo\nthree"[..]);
        assert_eq!(captured, b"one\ntwo\nthree");
    }

    #[test]
    fn forward_writes_to_sink() {
        let buffer = CaptureBuffer::new();
        forward(&b"a\nb\n"[..], &buffer.sink());
        assert_eq!(buffer.contents(), "a\nb\n");
    }

    #[test]
    fn collect_empty_pipe() {
        assert!(collect(&b""[..]).is_empty());
    }
}
