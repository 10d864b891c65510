//! Unified error type for the Cornerjump engine.

use cornerjump_match::MatchError;
use cornerjump_protocol::{ErrorCode, ErrorReply, ProtocolError};

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapped variant generates the `From`
/// impl, so `?` converts lower-layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The frame could not be decoded or the reply encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The match layer refused the request.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// No caller identity, or a caller speaking for someone else.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}

impl EngineError {
    /// The wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Protocol(_) => ErrorCode::BadPayload,
            Self::Match(e) => e.code(),
            Self::Unauthenticated(_) => ErrorCode::Unauthenticated,
        }
    }

    /// The structured rejection sent back to the requester.
    pub fn to_reply(&self) -> ErrorReply {
        ErrorReply::new(self.code(), self.to_string())
    }
}
