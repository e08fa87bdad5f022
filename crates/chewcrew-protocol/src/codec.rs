//! Body encoding for the room API.
//!
//! Handlers write every response through a [`Codec`], which also names
//! the `Content-Type` header that goes with the bytes.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Turns response bodies into bytes, and bytes back into bodies.
pub trait Codec: Send + Sync + 'static {
    /// The `Content-Type` this codec produces.
    fn content_type(&self) -> &'static str;

    /// # Errors
    /// `ProtocolError::Encode` if `value` can't be represented.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Reads a body back. Clients and tests use this; the server only
    /// encodes.
    ///
    /// # Errors
    /// `ProtocolError::Decode` if `data` isn't a valid `T`.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// The JSON codec every endpoint uses. Requires the `json` feature,
/// which is on by default.
///
/// ## Example
///
/// ```rust
/// use chewcrew_protocol::{Codec, JsonCodec, RoomId, RoomView};
///
/// let codec = JsonCodec;
/// let view = RoomView {
///     id: RoomId::from("abc"),
///     hostid: None,
///     voters: vec!["ana".into()],
///     choices: vec!["sushi".into(), "pizza".into()],
///     winner: None,
/// };
///
/// let bytes = codec.encode(&view).unwrap();
/// let decoded: RoomView = codec.decode(&bytes).unwrap();
/// assert_eq!(view, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
