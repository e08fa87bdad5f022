//! Voting room lifecycle for ChewCrew.
//!
//! A room is a short-lived vote over a fixed set of categories. Each
//! room guards its own mutable state with its own lock; the registry of
//! rooms has a separate lock and the two are never nested.
//!
//! # Key types
//!
//! - [`Room`]: the aggregate: choices, tally, voters, winner
//! - [`RoomStore`]: registry of every room, keyed by [`RoomId`](chewcrew_protocol::RoomId)
//! - [`Tally`] / [`select_winner`]: vote counts and deterministic winner selection
//! - [`IdGenerator`]: source of room IDs and host secrets
//! - [`RoomState`]: `Open` → `Closed`, nothing else
//! - [`RoomConfig`]: ID length and collision retry budget

mod config;
mod error;
mod ids;
mod room;
mod store;
mod tally;

pub use config::{RoomConfig, RoomState, Winner};
pub use error::RoomError;
pub use ids::{IdGenerator, RandomIds};
pub use room::{Room, RoomSnapshot};
pub use store::RoomStore;
pub use tally::{Tally, select_winner};
