//! Service-level configuration.

use std::time::Duration;

use chewcrew_room::RoomConfig;

/// Settings for a [`RoomService`](crate::RoomService).
///
/// Start from `ServiceConfig::default()` and override what you need.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Room ID length and collision retry budget.
    pub room: RoomConfig,

    /// Upper bound on a single place lookup while ending a room.
    ///
    /// Default: 5 seconds.
    pub lookup_timeout: Duration,

    /// How many times End tries the place lookup before failing.
    /// Values below 1 are treated as 1.
    ///
    /// Default: 1 (no retry).
    pub lookup_attempts: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            room: RoomConfig::default(),
            lookup_timeout: Duration::from_secs(5),
            lookup_attempts: 1,
        }
    }
}
