//! Exit status of a completed kubectl invocation.

use std::fmt;
use std::process::ExitStatus;

/// Exit status recorded after each synchronous invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastStatus {
    code: Option<i32>,
}

impl LastStatus {
    /// `None` means the child did not exit normally (e.g. killed by a signal).
    pub fn from_code(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// True only for exit code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for LastStatus {
    fn from(status: ExitStatus) -> Self {
        Self::from_code(status.code())
    }
}

impl fmt::Display for LastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}", code),
            None => write!(f, "unknown (terminated by signal)"),
        }
    }
}

/// What a synchronous invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub status: LastStatus,
    /// Raw child stdout; only present in capture mode.
    pub stdout: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_zero_is_success() {
        assert!(LastStatus::from_code(Some(0)).success());
        assert!(!LastStatus::from_code(Some(1)).success());
        assert!(!LastStatus::from_code(None).success());
    }

    #[test]
    fn display_shows_code() {
        assert_eq!(LastStatus::from_code(Some(127)).to_string(), "127");
        assert_eq!(
            LastStatus::from_code(None).to_string(),
            "unknown (terminated by signal)"
        );
    }
}
