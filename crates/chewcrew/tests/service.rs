//! Integration tests for `RoomService`: secrecy, host checks, idempotent
//! closing, provider timeouts, and concurrent access.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chewcrew::prelude::*;
use futures_util::future::join_all;
use tokio::sync::{Notify, oneshot};

// =========================================================================
// Mock provider and ID generator
// =========================================================================

/// Echoes the winning category as the place (suffixed with the address
/// when one was given) and counts resolve calls.
struct CountingPlaces {
    categories: Vec<Category>,
    resolves: AtomicUsize,
    failures_left: AtomicUsize,
    delay: Duration,
}

impl CountingPlaces {
    fn new(categories: &[&str]) -> Self {
        Self {
            categories: categories.iter().map(|c| (*c).into()).collect(),
            resolves: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    fn failing_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn resolve_calls(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

impl PlaceProvider for CountingPlaces {
    async fn categories(
        &self,
        _options: &PlaceOptions,
    ) -> Result<Vec<Category>, PlaceError> {
        Ok(self.categories.clone())
    }

    async fn resolve(
        &self,
        options: &PlaceOptions,
        category: &Category,
    ) -> Result<Place, PlaceError> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(PlaceError::Unavailable("upstream 503".into()));
        }
        if options.address.is_empty() {
            Ok(Place(category.0.clone()))
        } else {
            Ok(Place(format!("{category} @ {}", options.address)))
        }
    }
}

/// Holds the first resolve call until the test releases it. Later calls
/// go straight through.
struct GatedPlaces {
    categories: Vec<Category>,
    entered: Arc<Notify>,
    release: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedPlaces {
    fn new(categories: &[&str]) -> (Self, Arc<Notify>, oneshot::Sender<()>) {
        let entered = Arc::new(Notify::new());
        let (tx, rx) = oneshot::channel();
        let places = Self {
            categories: categories.iter().map(|c| (*c).into()).collect(),
            entered: Arc::clone(&entered),
            release: tokio::sync::Mutex::new(Some(rx)),
        };
        (places, entered, tx)
    }
}

impl PlaceProvider for GatedPlaces {
    async fn categories(
        &self,
        _options: &PlaceOptions,
    ) -> Result<Vec<Category>, PlaceError> {
        Ok(self.categories.clone())
    }

    async fn resolve(
        &self,
        _options: &PlaceOptions,
        category: &Category,
    ) -> Result<Place, PlaceError> {
        let gate = self.release.lock().await.take();
        if let Some(gate) = gate {
            self.entered.notify_one();
            let _ = gate.await;
        }
        Ok(Place(format!("{category} place")))
    }
}

/// Hands out scripted IDs, then a numbered fallback.
struct ScriptedIds {
    script: Mutex<VecDeque<String>>,
    counter: AtomicUsize,
}

impl ScriptedIds {
    fn new(script: &[&str]) -> Self {
        Self {
            script: Mutex::new(script.iter().map(|s| (*s).to_owned()).collect()),
            counter: AtomicUsize::new(0),
        }
    }
}

impl IdGenerator for ScriptedIds {
    fn generate(&self, _len: usize) -> String {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("gen-{}", self.counter.fetch_add(1, Ordering::SeqCst)))
    }
}

/// Always returns the same ID.
struct StuckIds;

impl IdGenerator for StuckIds {
    fn generate(&self, _len: usize) -> String {
        "same".to_owned()
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn service(categories: &[&str]) -> RoomService<CountingPlaces> {
    RoomService::new(CountingPlaces::new(categories), ServiceConfig::default())
}

fn secret(view: &RoomView) -> String {
    view.hostid
        .as_ref()
        .expect("creation view carries the host secret")
        .as_str()
        .to_owned()
}

fn room_error(err: ChewcrewError) -> RoomError {
    match err {
        ChewcrewError::Room(e) => e,
        other => panic!("expected a room error, got {other:?}"),
    }
}

// =========================================================================
// New / Get
// =========================================================================

#[tokio::test]
async fn test_create_returns_secret_choices_and_no_winner() {
    let svc = service(&["sushi", "pizza"]);

    let view = svc.create("").await.unwrap();

    assert_eq!(view.id.as_str().len(), 11);
    assert_eq!(secret(&view).len(), 11);
    assert_eq!(view.choices, ["sushi", "pizza"]);
    assert!(view.voters.is_empty());
    assert_eq!(view.winner, None);
}

#[tokio::test]
async fn test_get_never_returns_secret() {
    let svc = service(&["sushi", "pizza"]);
    let created = svc.create("").await.unwrap();

    let view = svc.get(created.id.as_str()).await.unwrap();

    assert_eq!(view.hostid, None);
    assert_eq!(view.choices, created.choices);
}

#[tokio::test]
async fn test_get_unknown_room_not_found() {
    let svc = service(&["sushi"]);

    let err = svc.get("missing").await.unwrap_err();

    assert!(matches!(room_error(err), RoomError::NotFound(_)));
}

#[tokio::test]
async fn test_create_with_no_categories_fails_and_registers_nothing() {
    let svc = service(&[]);

    let err = svc.create("").await.unwrap_err();

    assert!(matches!(room_error(err), RoomError::EmptyChoiceSet));
    assert!(svc.store().is_empty().await);
}

#[tokio::test]
async fn test_create_regenerates_colliding_id() {
    let svc = service(&["sushi"]).with_id_generator(ScriptedIds::new(&[
        "dup", "s1", // first room
        "dup", "s2", // collides
        "fresh", "s3",
    ]));

    let first = svc.create("").await.unwrap();
    let second = svc.create("").await.unwrap();

    assert_eq!(first.id.as_str(), "dup");
    assert_eq!(second.id.as_str(), "fresh");
    assert_eq!(secret(&second), "s3");
    assert_eq!(svc.store().len().await, 2);
}

#[tokio::test]
async fn test_create_gives_up_after_max_id_attempts() {
    let svc = service(&["sushi"]).with_id_generator(StuckIds);
    svc.create("").await.unwrap();

    let err = svc.create("").await.unwrap_err();

    assert!(matches!(err, ChewcrewError::IdExhausted(5)));
    assert_eq!(svc.store().len().await, 1);
}

// =========================================================================
// Vote
// =========================================================================

#[tokio::test]
async fn test_vote_unknown_room_not_found() {
    let svc = service(&["sushi"]);

    let err = svc.vote("missing", "ana", "sushi").await.unwrap_err();

    assert!(matches!(room_error(err), RoomError::NotFound(_)));
}

#[tokio::test]
async fn test_vote_for_unknown_choice_rejected() {
    // Strict policy: a vote for a choice the room doesn't offer is an
    // error, not a new counter.
    let svc = service(&["sushi", "pizza"]);
    let room = svc.create("").await.unwrap();

    let err = svc.vote(room.id.as_str(), "ana", "burgers").await.unwrap_err();

    assert!(matches!(room_error(err), RoomError::InvalidChoice(c) if c == "burgers"));
    let view = svc.get(room.id.as_str()).await.unwrap();
    assert!(view.voters.is_empty());
}

#[tokio::test]
async fn test_vote_after_end_rejected_without_mutation() {
    let svc = service(&["sushi", "pizza"]);
    let room = svc.create("").await.unwrap();
    let id = room.id.as_str();
    svc.vote(id, "ana", "sushi").await.unwrap();
    svc.end(id, &secret(&room)).await.unwrap();
    let before = svc.store().lookup(id).await.unwrap().snapshot().await;

    let err = svc.vote(id, "ben", "pizza").await.unwrap_err();

    assert!(matches!(room_error(err), RoomError::RoomEnded(_)));
    let after = svc.store().lookup(id).await.unwrap().snapshot().await;
    assert_eq!(after.voters, before.voters);
    assert_eq!(after.tally, before.tally);
}

// =========================================================================
// End
// =========================================================================

#[tokio::test]
async fn test_scenario_pizza_wins() {
    let svc = service(&["sushi", "pizza"]);
    let room = svc.create("").await.unwrap();
    let id = room.id.as_str();
    svc.vote(id, "ana", "pizza").await.unwrap();
    svc.vote(id, "ben", "pizza").await.unwrap();
    svc.vote(id, "cy", "sushi").await.unwrap();

    let before = svc.get(id).await.unwrap();
    assert_eq!(before.winner, None);
    assert_eq!(before.voters, ["ana", "ben", "cy"]);

    let ended = svc.end(id, &secret(&room)).await.unwrap();
    assert_eq!(ended.winner.as_deref(), Some("pizza"));
    assert_eq!(ended.hostid, None);

    let after = svc.get(id).await.unwrap();
    assert_eq!(after.winner.as_deref(), Some("pizza"));
    assert_eq!(after.hostid, None);
}

#[tokio::test]
async fn test_end_unknown_room_not_found() {
    let svc = service(&["sushi"]);

    let err = svc.end("missing", "whatever").await.unwrap_err();

    assert!(matches!(room_error(err), RoomError::NotFound(_)));
}

#[tokio::test]
async fn test_end_wrong_secret_leaves_room_untouched() {
    let svc = service(&["sushi", "pizza"]);
    let room = svc.create("").await.unwrap();
    let id = room.id.as_str();
    svc.vote(id, "ana", "pizza").await.unwrap();
    let before = svc.store().lookup(id).await.unwrap().snapshot().await;

    let err = svc.end(id, "not-the-secret").await.unwrap_err();

    assert!(matches!(err, ChewcrewError::Unauthorized(_)));
    let after = svc.store().lookup(id).await.unwrap().snapshot().await;
    assert!(after.state.is_open());
    assert_eq!(after.voters, before.voters);
    assert_eq!(after.tally, before.tally);
    assert_eq!(svc.places().resolve_calls(), 0);
    // Voting still works.
    svc.vote(id, "ben", "sushi").await.unwrap();
}

#[tokio::test]
async fn test_end_with_another_rooms_secret_unauthorized() {
    let svc = service(&["sushi"]);
    let a = svc.create("").await.unwrap();
    let b = svc.create("").await.unwrap();

    let err = svc.end(a.id.as_str(), &secret(&b)).await.unwrap_err();

    assert!(matches!(err, ChewcrewError::Unauthorized(_)));
}

#[tokio::test]
async fn test_end_twice_is_idempotent_without_second_lookup() {
    let svc = service(&["sushi", "pizza"]);
    let room = svc.create("").await.unwrap();
    let id = room.id.as_str();
    svc.vote(id, "ana", "sushi").await.unwrap();

    let first = svc.end(id, &secret(&room)).await.unwrap();
    let second = svc.end(id, &secret(&room)).await.unwrap();

    assert_eq!(first.winner.as_deref(), Some("sushi"));
    assert_eq!(second.winner, first.winner);
    assert_eq!(svc.places().resolve_calls(), 1);
}

#[tokio::test]
async fn test_end_with_no_votes_picks_first_declared_choice() {
    let svc = service(&["tacos", "sushi", "pizza"]);
    let room = svc.create("").await.unwrap();

    let ended = svc.end(room.id.as_str(), &secret(&room)).await.unwrap();

    assert_eq!(ended.winner.as_deref(), Some("tacos"));
}

#[tokio::test]
async fn test_end_tie_goes_to_earliest_declared_choice() {
    let svc = service(&["tacos", "sushi", "pizza"]);
    let room = svc.create("").await.unwrap();
    let id = room.id.as_str();
    svc.vote(id, "a", "pizza").await.unwrap();
    svc.vote(id, "b", "sushi").await.unwrap();

    let ended = svc.end(id, &secret(&room)).await.unwrap();

    assert_eq!(ended.winner.as_deref(), Some("sushi"));
}

#[tokio::test]
async fn test_address_reaches_place_lookup() {
    let svc = service(&["sushi"]);
    let room = svc.create("1 Main St").await.unwrap();

    let ended = svc.end(room.id.as_str(), &secret(&room)).await.unwrap();

    assert_eq!(ended.winner.as_deref(), Some("sushi @ 1 Main St"));
}

#[tokio::test(start_paused = true)]
async fn test_end_lookup_timeout_leaves_room_open() {
    let places = CountingPlaces::new(&["sushi", "pizza"]).slow(Duration::from_secs(60));
    let svc = RoomService::new(places, ServiceConfig::default());
    let room = svc.create("").await.unwrap();
    let id = room.id.as_str();

    let err = svc.end(id, &secret(&room)).await.unwrap_err();

    assert!(matches!(err, ChewcrewError::LookupTimeout));
    assert!(err.is_retryable());
    let view = svc.get(id).await.unwrap();
    assert_eq!(view.winner, None);
    svc.vote(id, "ana", "pizza").await.unwrap();
}

#[tokio::test]
async fn test_end_retries_failed_lookup() {
    let places = CountingPlaces::new(&["sushi"]).failing_first(2);
    let config = ServiceConfig {
        lookup_attempts: 3,
        ..ServiceConfig::default()
    };
    let svc = RoomService::new(places, config);
    let room = svc.create("").await.unwrap();

    let ended = svc.end(room.id.as_str(), &secret(&room)).await.unwrap();

    assert_eq!(ended.winner.as_deref(), Some("sushi"));
    assert_eq!(svc.places().resolve_calls(), 3);
}

#[tokio::test]
async fn test_end_lookup_failure_keeps_room_open_and_retryable() {
    let places = CountingPlaces::new(&["sushi"]).failing_first(1);
    let svc = RoomService::new(places, ServiceConfig::default());
    let room = svc.create("").await.unwrap();
    let id = room.id.as_str();

    let err = svc.end(id, &secret(&room)).await.unwrap_err();
    assert!(matches!(err, ChewcrewError::PlaceLookup(PlaceError::Unavailable(_))));
    assert_eq!(svc.get(id).await.unwrap().winner, None);

    // The provider has recovered; ending again succeeds.
    let ended = svc.end(id, &secret(&room)).await.unwrap();
    assert_eq!(ended.winner.as_deref(), Some("sushi"));
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_votes_through_service() {
    let choices: Vec<String> = (0..32).map(|i| format!("c{i}")).collect();
    let refs: Vec<&str> = choices.iter().map(String::as_str).collect();
    let svc = Arc::new(service(&refs));
    let room = svc.create("").await.unwrap();

    let tasks = choices.iter().enumerate().map(|(i, choice)| {
        let svc = Arc::clone(&svc);
        let id = room.id.as_str().to_owned();
        let choice = choice.clone();
        tokio::spawn(async move { svc.vote(&id, &format!("v{i}"), &choice).await })
    });
    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let snap = svc.store().lookup(room.id.as_str()).await.unwrap().snapshot().await;
    assert_eq!(snap.voters.len(), 32);
    assert_eq!(snap.tally.total(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ends_agree_on_winner() {
    let svc = Arc::new(service(&["sushi", "pizza"]));
    let room = svc.create("").await.unwrap();
    svc.vote(room.id.as_str(), "ana", "pizza").await.unwrap();
    let host = secret(&room);

    let tasks = (0..8).map(|_| {
        let svc = Arc::clone(&svc);
        let id = room.id.as_str().to_owned();
        let host = host.clone();
        tokio::spawn(async move { svc.end(&id, &host).await })
    });
    let winners: Vec<Option<String>> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap().winner)
        .collect();

    assert!(winners.iter().all(|w| w.as_deref() == Some("pizza")));
}

#[tokio::test]
async fn test_end_that_loses_the_close_race_keeps_earlier_winner() {
    let (places, entered, release) = GatedPlaces::new(&["sushi", "pizza"]);
    let svc = Arc::new(RoomService::new(places, ServiceConfig::default()));
    let room = svc.create("").await.unwrap();
    let id = room.id.as_str().to_owned();
    let host = secret(&room);
    svc.vote(&id, "ana", "sushi").await.unwrap();

    // First End snapshots "sushi" and parks inside resolve.
    let first = {
        let svc = Arc::clone(&svc);
        let (id, host) = (id.clone(), host.clone());
        tokio::spawn(async move { svc.end(&id, &host).await })
    };
    entered.notified().await;

    // The lead changes and a second End closes the room with it.
    svc.vote(&id, "ben", "pizza").await.unwrap();
    svc.vote(&id, "cy", "pizza").await.unwrap();
    let second = svc.end(&id, &host).await.unwrap();
    assert_eq!(second.winner.as_deref(), Some("pizza place"));

    release.send(()).unwrap();
    let first = first.await.unwrap().unwrap();

    assert_eq!(first.winner.as_deref(), Some("pizza place"));
    let snapshot = svc.store().lookup(&id).await.unwrap().snapshot().await;
    let winner = snapshot.state.winner().expect("room is closed");
    assert_eq!(winner.category.0, "pizza");
    assert_eq!(winner.place, "pizza place");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rooms_are_independent() {
    let svc = Arc::new(service(&["sushi", "pizza"]));
    let a = svc.create("").await.unwrap();
    let b = svc.create("").await.unwrap();

    svc.vote(a.id.as_str(), "ana", "sushi").await.unwrap();
    svc.end(a.id.as_str(), &secret(&a)).await.unwrap();
    svc.vote(b.id.as_str(), "ben", "pizza").await.unwrap();

    let b_view = svc.get(b.id.as_str()).await.unwrap();
    assert_eq!(b_view.winner, None);
    assert_eq!(b_view.voters, ["ben"]);
}
