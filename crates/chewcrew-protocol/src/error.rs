//! Error types for the protocol layer.

/// Failures turning bodies into bytes or back.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A view or error body couldn't be serialized.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// A body couldn't be parsed as the requested type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
