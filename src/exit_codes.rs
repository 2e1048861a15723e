//! Exit code constants for the kubecli binary.
//!
//! - 0: Success
//! - 1: User error (bad arguments, invalid configuration)
//! - 2: kubectl exited with a non-zero status
//! - 3: kubectl succeeded but its output could not be decoded
//! - 4: kubectl could not be started or fed its input

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// kubectl ran and reported failure.
pub const KUBECTL_FAILURE: i32 = 2;

/// kubectl reported success but printed something that is not the expected JSON.
pub const PARSE_FAILURE: i32 = 3;

/// The child process could not be spawned, replaced, or written to.
pub const PROCESS_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            KUBECTL_FAILURE,
            PARSE_FAILURE,
            PROCESS_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_fit_in_a_byte() {
        for code in [
            SUCCESS,
            USER_ERROR,
            KUBECTL_FAILURE,
            PARSE_FAILURE,
            PROCESS_FAILURE,
        ] {
            assert!(u8::try_from(code).is_ok());
        }
    }
}
