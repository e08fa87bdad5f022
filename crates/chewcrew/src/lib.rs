//! # ChewCrew
//!
//! Group voting rooms for picking where to eat.
//!
//! A host creates a room, everyone votes for a category, and the host
//! ends the vote. The winning category is resolved to a venue by a
//! [`PlaceProvider`](chewcrew_places::PlaceProvider) the application
//! supplies.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chewcrew::prelude::*;
//!
//! # async fn run() -> Result<(), ChewcrewError> {
//! let places = StaticPlaces::new(["sushi", "pizza", "tacos"]);
//! let server = ChewcrewServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(places)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;
mod service;

pub use config::ServiceConfig;
pub use error::ChewcrewError;
pub use server::{ChewcrewServer, ChewcrewServerBuilder, router};
pub use service::RoomService;

/// Everything needed to embed or run a ChewCrew server.
pub mod prelude {
    pub use crate::{
        ChewcrewError, ChewcrewServer, ChewcrewServerBuilder, RoomService,
        ServiceConfig, router,
    };
    pub use chewcrew_places::{
        Category, Place, PlaceError, PlaceOptions, PlaceProvider,
        StaticPlaces,
    };
    pub use chewcrew_protocol::{HostSecret, RoomId, RoomView};
    pub use chewcrew_room::{IdGenerator, RandomIds, RoomConfig, RoomError};
}
