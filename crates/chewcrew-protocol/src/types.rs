//! Core wire types for the ChewCrew room API.
//!
//! Every type here is something a caller either sends (query parameters)
//! or receives (JSON bodies).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The opaque identifier of a room.
///
/// `#[serde(transparent)]` keeps the JSON representation a plain string:
/// `RoomId("x7Gk2")` becomes `"x7Gk2"`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Lets maps keyed by `RoomId` be queried with a plain `&str`.
impl Borrow<str> for RoomId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The credential that lets a room's creator end the vote.
///
/// `Debug` is written by hand so a secret never shows up in logs or
/// panic messages. There is no `Display` impl.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostSecret(String);

impl HostSecret {
    /// Wraps a freshly generated secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the secret as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `candidate` is this secret.
    ///
    /// Compares every byte regardless of where the first mismatch is.
    pub fn matches(&self, candidate: &str) -> bool {
        let (a, b) = (self.0.as_bytes(), candidate.as_bytes());
        if a.len() != b.len() {
            return false;
        }
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl fmt::Debug for HostSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostSecret(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// The JSON view of a room returned to callers.
///
/// Field presence is part of the contract:
/// - `hostid` only appears in the response that created the room.
/// - `voters` and `choices` are omitted when empty.
/// - `winner` is omitted while the room is still open.
///
/// Running vote counts are never part of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub id: RoomId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostid: Option<HostSecret>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voters: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

/// The `{"error": "<message>"}` envelope used for every failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------
//
// Every field defaults to the empty string. A missing `id` is therefore
// just an id no room has, and fails as "not found" further down.

/// `GET /room?id=...`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomQuery {
    pub id: String,
}

/// `/room/new?address=...`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewRoomQuery {
    /// Where the group is, forwarded to the place provider.
    pub address: String,
}

/// `/room/vote?id=...&name=...&vote=...`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteQuery {
    pub id: String,
    pub name: String,
    pub vote: String,
}

/// `/room/end?id=...&hostid=...`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndQuery {
    pub id: String,
    pub hostid: String,
}
