//! Error types for the places layer.

use crate::Category;

/// Errors a [`PlaceProvider`](crate::PlaceProvider) can report.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The provider has no venue for the requested category.
    #[error("no place found for category {0}")]
    NoPlaceFound(Category),

    /// The provider itself could not be reached or answered badly.
    #[error("place lookup unavailable: {0}")]
    Unavailable(String),
}
