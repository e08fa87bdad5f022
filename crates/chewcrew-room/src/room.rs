//! The room aggregate.
//!
//! A [`Room`] splits into two halves:
//! - immutable fields (`id`, `host_secret`, `choices`, `options`) that
//!   anyone holding the room can read without locking, and
//! - mutable fields (`voters`, `tally`, `state`) that live behind the
//!   room's own mutex. Every read or write of them takes that lock for
//!   the whole operation and nothing else.
//!
//! Rooms are shared as `Arc<Room>` between the store and request tasks.

use chewcrew_places::{Category, PlaceOptions};
use chewcrew_protocol::{HostSecret, RoomId, RoomView};
use tokio::sync::Mutex;

use crate::{RoomError, RoomState, Tally, Winner};

/// The mutable half of a room. Only reachable through `Room::inner`.
#[derive(Debug)]
struct RoomInner {
    voters: Vec<String>,
    tally: Tally,
    state: RoomState,
}

/// A point-in-time copy of a room's state, taken under its lock.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub choices: Vec<Category>,
    pub voters: Vec<String>,
    pub tally: Tally,
    pub state: RoomState,
}

impl RoomSnapshot {
    /// The public view: no host secret, no running counts.
    pub fn view(&self) -> RoomView {
        RoomView {
            id: self.id.clone(),
            hostid: None,
            voters: self.voters.clone(),
            choices: self.choices.iter().map(|c| c.0.clone()).collect(),
            winner: self.state.winner().map(|w| w.place.clone()),
        }
    }
}

/// A voting session over a fixed set of choices.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    host_secret: HostSecret,
    choices: Vec<Category>,
    options: PlaceOptions,
    inner: Mutex<RoomInner>,
}

impl Room {
    /// Creates an open room with a zeroed tally.
    ///
    /// Duplicate entries in `choices` are dropped, keeping the first
    /// occurrence, so declaration order survives.
    ///
    /// # Errors
    /// [`RoomError::EmptyChoiceSet`] if there is nothing to vote on.
    pub fn new(
        id: RoomId,
        host_secret: HostSecret,
        choices: Vec<Category>,
        options: PlaceOptions,
    ) -> Result<Self, RoomError> {
        let mut distinct: Vec<Category> = Vec::with_capacity(choices.len());
        for choice in choices {
            if distinct.contains(&choice) {
                tracing::debug!(room_id = %id, %choice, "dropping duplicate choice");
                continue;
            }
            distinct.push(choice);
        }
        if distinct.is_empty() {
            return Err(RoomError::EmptyChoiceSet);
        }

        let tally = Tally::new(&distinct);
        Ok(Self {
            id,
            host_secret,
            choices: distinct,
            options,
            inner: Mutex::new(RoomInner {
                voters: Vec::new(),
                tally,
                state: RoomState::Open,
            }),
        })
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// The choices in declaration order.
    pub fn choices(&self) -> &[Category] {
        &self.choices
    }

    /// The search options forwarded to the place provider.
    pub fn options(&self) -> &PlaceOptions {
        &self.options
    }

    /// Returns `true` if `candidate` is this room's host secret.
    pub fn verify_host(&self, candidate: &str) -> bool {
        self.host_secret.matches(candidate)
    }

    /// Records one vote.
    ///
    /// The choice is validated before anything is written, so a failed
    /// vote leaves both `voters` and the tally untouched.
    ///
    /// # Errors
    /// - [`RoomError::RoomEnded`]: the room is closed
    /// - [`RoomError::InvalidChoice`]: `choice` isn't offered here
    pub async fn record_vote(
        &self,
        voter: &str,
        choice: &str,
    ) -> Result<(), RoomError> {
        let mut inner = self.inner.lock().await;
        if !inner.state.is_open() {
            return Err(RoomError::RoomEnded(self.id.clone()));
        }
        inner.tally.increment(choice)?;
        inner.voters.push(voter.to_owned());

        tracing::debug!(
            room_id = %self.id,
            voters = inner.voters.len(),
            "vote recorded"
        );
        Ok(())
    }

    /// Records the winner and closes the room. Happens at most once.
    ///
    /// # Errors
    /// [`RoomError::AlreadyEnded`] if a winner is already recorded. The
    /// existing winner is kept.
    pub async fn close(&self, winner: Winner) -> Result<(), RoomError> {
        let mut inner = self.inner.lock().await;
        if !inner.state.is_open() {
            return Err(RoomError::AlreadyEnded(self.id.clone()));
        }
        tracing::info!(
            room_id = %self.id,
            category = %winner.category,
            place = %winner.place,
            "room closed"
        );
        inner.state = RoomState::Closed(winner);
        Ok(())
    }

    /// Copies the current state out from under the lock.
    pub async fn snapshot(&self) -> RoomSnapshot {
        let inner = self.inner.lock().await;
        RoomSnapshot {
            id: self.id.clone(),
            choices: self.choices.clone(),
            voters: inner.voters.clone(),
            tally: inner.tally.clone(),
            state: inner.state.clone(),
        }
    }

    /// The public view of the room.
    pub async fn view(&self) -> RoomView {
        self.snapshot().await.view()
    }

    /// The view handed to the room's creator, the only one that carries
    /// the host secret.
    pub async fn creation_view(&self) -> RoomView {
        RoomView {
            hostid: Some(self.host_secret.clone()),
            ..self.view().await
        }
    }
}
