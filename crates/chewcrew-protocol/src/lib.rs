//! Wire protocol for ChewCrew.
//!
//! This crate defines what callers of the room API see:
//!
//! - **Identifiers** ([`RoomId`], [`HostSecret`]): the opaque strings
//!   that name a room and authorize its host.
//! - **Views** ([`RoomView`], [`ErrorBody`]): the JSON bodies returned
//!   by every endpoint.
//! - **Queries** ([`RoomQuery`], [`NewRoomQuery`], [`VoteQuery`],
//!   [`EndQuery`]): the query-string parameters each endpoint accepts.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how views become bytes.
//!
//! It knows nothing about rooms as mutable state. The room crate builds
//! views; this crate only describes their shape.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    EndQuery, ErrorBody, HostSecret, NewRoomQuery, RoomId, RoomQuery,
    RoomView, VoteQuery,
};
