//! Error types for the room layer.

use chewcrew_protocol::RoomId;

/// Errors that can occur during room operations.
///
/// The display strings are what callers see in the `{"error": ...}`
/// envelope, so they stay short and free of secrets.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room is registered under this ID.
    #[error("Room not found")]
    NotFound(RoomId),

    /// A vote arrived after the room was closed.
    #[error("Room has ended")]
    RoomEnded(RoomId),

    /// `close` was called on a room that already has a winner.
    #[error("Room has already ended")]
    AlreadyEnded(RoomId),

    /// The vote names a choice the room doesn't offer.
    #[error("Invalid choice: {0}")]
    InvalidChoice(String),

    /// The generated ID is already taken. Callers regenerate and retry.
    #[error("Room ID {0} already exists")]
    DuplicateId(RoomId),

    /// The room has nothing to vote over.
    #[error("No choices available")]
    EmptyChoiceSet,
}
