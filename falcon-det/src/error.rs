//! Errors reported by the det1024 operations.

use crate::engine::Status;
use thiserror::Error;

/// Failure of one det1024 operation, carrying the raw engine status.
///
/// Every kind is final: the engine is deterministic, so retrying with the same
/// inputs fails the same way. Verification failures are deliberately not
/// broken down further than [`Error::VerifyFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Key generation failed
    #[error("falcon keygen failed: error code {code}")]
    KeygenFailed { code: Status },

    /// Signing failed, e.g. because of a malformed private key
    #[error("falcon sign failed: error code {code}")]
    SignFailed { code: Status },

    /// The signature is not valid for this key and message
    #[error("falcon verify failed: error code {code}")]
    VerifyFailed { code: Status },

    /// The input is not a well-formed compressed signature
    #[error("falcon convert to CT failed: error code {code}")]
    ConvertFailed { code: Status },
}

impl Error {
    /// Raw engine status behind this error.
    pub fn code(&self) -> Status {
        match *self {
            Error::KeygenFailed { code }
            | Error::SignFailed { code }
            | Error::VerifyFailed { code }
            | Error::ConvertFailed { code } => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_includes_code() {
        let err = Error::SignFailed { code: -3 };
        assert_eq!(err.to_string(), "falcon sign failed: error code -3");
        assert_eq!(err.code(), -3);
        assert_eq!(Error::VerifyFailed { code: -4 }.code(), -4);
    }
}
