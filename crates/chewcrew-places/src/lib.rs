//! Place lookup for ChewCrew.
//!
//! ChewCrew doesn't know where anyone can eat. A [`PlaceProvider`]
//! supplies the categories a room votes over and turns the winning
//! category into a concrete venue.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Service (above)  ← asks for categories on New, resolves the winner on End
//!     ↕
//! Places (this crate)   ← an injected provider, never a concrete dependency
//! ```

mod error;
mod provider;
mod types;

pub use error::PlaceError;
pub use provider::{PlaceProvider, StaticPlaces};
pub use types::{Category, Place, PlaceOptions};
