//! Error types for the protocol layer.
//!
//! Each crate in Cornerjump defines its own error enum. A `ProtocolError`
//! always means the bytes themselves were the problem, never the game.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, wrong
    /// data types, or an unknown request `type`.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded but is not valid at the protocol level,
    /// e.g. a board grid with a row of the wrong length or an unknown
    /// piece letter.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
