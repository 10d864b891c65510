//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The engine never cares HOW messages are serialized; the service only
//! needs something that implements [`Codec`].

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the service that owns the codec is
/// shared across Tokio tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use cornerjump_protocol::{Codec, JsonCodec, JoinMatch, ClientRequest, MatchId, PlayerId};
///
/// let codec = JsonCodec;
/// let request = ClientRequest::Join(JoinMatch {
///     match_id: MatchId(7),
///     participant_id: PlayerId(1),
/// });
///
/// let bytes = codec.encode(&request).unwrap();
/// let decoded: ClientRequest = codec.decode(&bytes).unwrap();
/// assert_eq!(request, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientRequest, ErrorCode};

    #[test]
    fn test_decode_garbage_returns_decode_error() {
        let result: Result<ClientRequest, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_request_type_fails() {
        let result: Result<ClientRequest, _> =
            JsonCodec.decode(br#"{"type":"Resign","match_id":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_error_code_is_screaming_snake_case() {
        let bytes = JsonCodec.encode(&ErrorCode::CaptureMismatch).unwrap();
        assert_eq!(bytes, br#""CAPTURE_MISMATCH""#);
    }
}
