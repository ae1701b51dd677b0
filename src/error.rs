// src/error.rs

use std::io;
use std::path::PathBuf;

use crate::cmvn::Block;

/// Why a `<LearnRateCoef>` line could not be turned into numbers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadFault {
    #[error("expected at least 4 tokens on the coefficient line, found {found}")]
    TooFewTokens { found: usize },

    #[error("token {token:?} at position {position} is not a valid float")]
    InvalidNumber { position: usize, token: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CmvnError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid frontend config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `line` is 1-based.
    #[error("malformed payload on line {line}: {fault}")]
    MalformedPayload { line: usize, fault: PayloadFault },

    #[error("no {0} block found in cmvn statistics")]
    MissingBlock(Block),

    #[error("neg_mean has {neg_mean} values but inv_std has {inv_std}")]
    LengthMismatch { neg_mean: usize, inv_std: usize },

    #[error("expected feature dimension {expected}, cmvn statistics have {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("feature buffer of length {found} does not fit cmvn dimension {expected}")]
    FrameLength { expected: usize, found: usize },
}

impl CmvnError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CmvnError::Io { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_payload_message_names_line_and_token() {
        let err = CmvnError::MalformedPayload {
            line: 7,
            fault: PayloadFault::InvalidNumber { position: 4, token: "abc".to_string() },
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"), "unexpected message: {}", msg);
        assert!(msg.contains("\"abc\""), "unexpected message: {}", msg);
        assert!(msg.contains("position 4"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;

        let err = CmvnError::io("am.mvn", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.to_string().contains("am.mvn"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("gone".to_string()));
    }
}
