//! Unified error type for ChewCrew.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chewcrew_places::PlaceError;
use chewcrew_protocol::{ErrorBody, ProtocolError, RoomId};
use chewcrew_room::RoomError;

use crate::handler::json_response;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapping variant lets `?` convert
/// sub-crate errors automatically. The display string of every variant
/// is what callers see in the `{"error": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum ChewcrewError {
    /// A room-level error (not found, ended, invalid choice, ...).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The place provider failed while listing categories or resolving
    /// the winner.
    #[error("Place lookup failed: {0}")]
    PlaceLookup(#[from] PlaceError),

    /// The place lookup did not answer within the configured timeout.
    /// The room is still open; ending it again may succeed.
    #[error("Place lookup timed out")]
    LookupTimeout,

    /// The query string couldn't be read into the endpoint's parameters.
    #[error("Invalid query: {0}")]
    BadQuery(String),

    /// End was called with the wrong host secret.
    #[error("Unauthorized host ID")]
    Unauthorized(RoomId),

    /// Every generated room ID collided with an existing room.
    #[error("could not allocate a room ID after {0} attempts")]
    IdExhausted(usize),

    /// A response body could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Binding or serving the listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChewcrewError {
    /// The HTTP status this error maps to. The body is always
    /// `{"error": <display string>}` whatever the status.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Room(RoomError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Room(RoomError::RoomEnded(_) | RoomError::AlreadyEnded(_)) => {
                StatusCode::CONFLICT
            }
            Self::Room(RoomError::InvalidChoice(_)) | Self::BadQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Room(RoomError::EmptyChoiceSet) | Self::PlaceLookup(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::LookupTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::Room(RoomError::DuplicateId(_))
            | Self::IdExhausted(_)
            | Self::Protocol(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LookupTimeout
                | Self::PlaceLookup(PlaceError::Unavailable(_))
                | Self::IdExhausted(_)
        )
    }
}

impl IntoResponse for ChewcrewError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        json_response(status, &ErrorBody::new(self.to_string()))
            .unwrap_or_else(|_| status.into_response())
    }
}
