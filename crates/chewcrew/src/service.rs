//! The room service: the only entry point HTTP handlers use.
//!
//! It resolves rooms through the [`RoomStore`], applies the host and
//! secrecy rules, and drives the place provider. Rooms do their own
//! locking; the service never holds a room lock across a provider call.

use chewcrew_places::{Category, Place, PlaceError, PlaceOptions, PlaceProvider};
use chewcrew_protocol::{HostSecret, RoomId, RoomView};
use chewcrew_room::{
    IdGenerator, RandomIds, Room, RoomError, RoomStore, Winner, select_winner,
};

use crate::{ChewcrewError, ServiceConfig};

/// Orchestrates Get / New / Vote / End over the room registry.
pub struct RoomService<P: PlaceProvider> {
    store: RoomStore,
    places: P,
    ids: Box<dyn IdGenerator>,
    config: ServiceConfig,
}

impl<P: PlaceProvider> RoomService<P> {
    /// Creates a service with an empty registry and random IDs.
    pub fn new(places: P, config: ServiceConfig) -> Self {
        Self {
            store: RoomStore::new(),
            places,
            ids: Box::new(RandomIds),
            config,
        }
    }

    /// Replaces the generator used for room IDs and host secrets.
    pub fn with_id_generator(mut self, ids: impl IdGenerator) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    pub fn places(&self) -> &P {
        &self.places
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the public view of a room.
    ///
    /// Never includes the host secret or the running vote counts.
    ///
    /// # Errors
    /// `Room not found` if no room has this ID.
    pub async fn get(&self, id: &str) -> Result<RoomView, ChewcrewError> {
        let room = self.store.lookup(id).await?;
        Ok(room.view().await)
    }

    /// Creates a room voting over the provider's categories for
    /// `address`.
    ///
    /// The returned view is the only one that carries the host secret.
    /// A room ID that collides with an existing room is regenerated up
    /// to `room.max_id_attempts` times.
    ///
    /// # Errors
    /// - `PlaceLookup`: the provider could not list categories
    /// - `EmptyChoiceSet`: the provider listed none
    /// - `IdExhausted`: every generated ID collided
    pub async fn create(&self, address: &str) -> Result<RoomView, ChewcrewError> {
        tracing::info!(%address, "creating room");

        let options = PlaceOptions::with_address(address);
        let choices = self.places.categories(&options).await?;
        let len = self.config.room.id_length;
        let max_attempts = self.config.room.max_id_attempts;

        for attempt in 1..=max_attempts {
            let room = Room::new(
                RoomId::from(self.ids.generate(len)),
                HostSecret::new(self.ids.generate(len)),
                choices.clone(),
                options.clone(),
            )?;
            match self.store.create(room).await {
                Ok(room) => {
                    tracing::info!(
                        room_id = %room.id(),
                        choices = room.choices().len(),
                        "room created"
                    );
                    return Ok(room.creation_view().await);
                }
                Err(RoomError::DuplicateId(id)) => {
                    tracing::warn!(room_id = %id, attempt, "room ID collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ChewcrewError::IdExhausted(max_attempts))
    }

    /// Records `name`'s vote for `choice`.
    ///
    /// # Errors
    /// - `Room not found`
    /// - `Room has ended`: the room already has a winner
    /// - `Invalid choice`: `choice` isn't offered by this room
    pub async fn vote(
        &self,
        id: &str,
        name: &str,
        choice: &str,
    ) -> Result<(), ChewcrewError> {
        tracing::info!(room_id = %id, voter = %name, "vote");

        let room = self.store.lookup(id).await?;
        room.record_vote(name, choice).await?;
        Ok(())
    }

    /// Ends the vote and returns the room with its winner.
    ///
    /// Ending an already-closed room succeeds and returns the recorded
    /// winner without another provider call.
    ///
    /// Otherwise the tally is copied under the room lock, the lock is
    /// released while the provider resolves the winning category, and
    /// the winner is written only if the room is still open. If a
    /// concurrent End got there first, its winner stands.
    ///
    /// # Errors
    /// - `Room not found`
    /// - `Unauthorized host ID`: the room is left untouched
    /// - `LookupTimeout` / `PlaceLookup`: the room stays open
    pub async fn end(
        &self,
        id: &str,
        host_secret: &str,
    ) -> Result<RoomView, ChewcrewError> {
        tracing::info!(room_id = %id, "ending room");

        let room = self.store.lookup(id).await?;
        if !room.verify_host(host_secret) {
            tracing::warn!(room_id = %id, "end rejected: wrong host secret");
            return Err(ChewcrewError::Unauthorized(room.id().clone()));
        }

        let snapshot = room.snapshot().await;
        if !snapshot.state.is_open() {
            tracing::debug!(room_id = %id, "room already closed");
            return Ok(snapshot.view());
        }

        let category = select_winner(&snapshot.tally)?;
        let place = self.resolve(&room, &category).await?;

        match room
            .close(Winner {
                category,
                place: place.into_inner(),
            })
            .await
        {
            Ok(()) => {}
            Err(RoomError::AlreadyEnded(_)) => {
                tracing::debug!(room_id = %id, "lost close race, keeping earlier winner");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(room.view().await)
    }

    /// Resolves `category` to a venue, bounded by the lookup timeout
    /// and retried up to `lookup_attempts` times.
    async fn resolve(
        &self,
        room: &Room,
        category: &Category,
    ) -> Result<Place, ChewcrewError> {
        let attempts = self.config.lookup_attempts.max(1);
        let mut last_error = ChewcrewError::LookupTimeout;

        for attempt in 1..=attempts {
            let lookup = self.places.resolve(room.options(), category);
            match tokio::time::timeout(self.config.lookup_timeout, lookup).await {
                Ok(Ok(place)) => return Ok(place),
                Ok(Err(e @ PlaceError::NoPlaceFound(_))) => {
                    tracing::warn!(room_id = %room.id(), %category, "no place found");
                    return Err(e.into());
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        room_id = %room.id(),
                        %category,
                        attempt,
                        error = %e,
                        "place lookup failed"
                    );
                    last_error = e.into();
                }
                Err(_) => {
                    tracing::warn!(
                        room_id = %room.id(),
                        %category,
                        attempt,
                        timeout_ms = self.config.lookup_timeout.as_millis() as u64,
                        "place lookup timed out"
                    );
                    last_error = ChewcrewError::LookupTimeout;
                }
            }
        }
        Err(last_error)
    }
}
