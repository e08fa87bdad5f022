//! Vote counts and winner selection.
//!
//! A [`Tally`] keeps one counter per choice, in the order the choices
//! were declared when the room was created. The set of keys is fixed at
//! construction: votes for anything else are rejected, so the keys of a
//! tally always equal the room's choices.

use chewcrew_places::Category;

use crate::RoomError;

/// Per-choice vote counters in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(Category, u64)>,
}

impl Tally {
    /// Creates a zeroed tally over `choices`.
    ///
    /// `choices` must already be distinct; [`Room::new`](crate::Room::new)
    /// de-duplicates provider output before calling this.
    pub fn new(choices: &[Category]) -> Self {
        Self {
            entries: choices.iter().map(|c| (c.clone(), 0)).collect(),
        }
    }

    /// Adds one vote for `choice`.
    ///
    /// # Errors
    /// [`RoomError::InvalidChoice`] if `choice` isn't one of the keys.
    /// The tally is left untouched in that case.
    pub fn increment(&mut self, choice: &str) -> Result<(), RoomError> {
        let (_, count) = self
            .entries
            .iter_mut()
            .find(|(c, _)| c.as_str() == choice)
            .ok_or_else(|| RoomError::InvalidChoice(choice.to_owned()))?;
        *count = count.saturating_add(1);
        Ok(())
    }

    /// Returns the count for `choice`, or `None` if it isn't a key.
    pub fn count(&self, choice: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(c, _)| c.as_str() == choice)
            .map(|(_, n)| *n)
    }

    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// The keys, in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter().map(|(c, _)| c)
    }

    /// `(choice, count)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, u64)> {
        self.entries.iter().map(|(c, n)| (c, *n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Picks the winning choice.
///
/// The choice with the strictly greatest count wins. Ties, including the
/// all-zero case, go to the earliest-declared choice. The result depends
/// only on the counts and their order, never on hashing.
///
/// # Errors
/// [`RoomError::EmptyChoiceSet`] if the tally has no choices.
pub fn select_winner(tally: &Tally) -> Result<Category, RoomError> {
    let mut best: Option<(&Category, u64)> = None;
    for (category, count) in tally.iter() {
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((category, count)),
        }
    }
    best.map(|(c, _)| c.clone()).ok_or(RoomError::EmptyChoiceSet)
}
