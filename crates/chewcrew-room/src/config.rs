//! Room configuration and state machine.

use chewcrew_places::Category;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Settings for creating rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Length of generated room IDs and host secrets.
    pub id_length: usize,

    /// How many times to regenerate a room ID that collides with an
    /// existing room before giving up.
    pub max_id_attempts: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            id_length: 11,
            max_id_attempts: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The result of closing a room: the category that won the tally and
/// the venue the place provider resolved it to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub category: Category,
    pub place: String,
}

/// The lifecycle state of a room.
///
/// ```text
/// Open ──(close)──→ Closed
/// ```
///
/// - **Open**: accepting votes, no winner yet.
/// - **Closed**: a winner is recorded. Terminal; votes are rejected and
///   the winner never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Open,
    Closed(Winner),
}

impl RoomState {
    /// Returns `true` while the room accepts votes.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns the winner once the room is closed.
    pub fn winner(&self) -> Option<&Winner> {
        match self {
            Self::Open => None,
            Self::Closed(winner) => Some(winner),
        }
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Closed(_) => write!(f, "Closed"),
        }
    }
}
