//! The place provider hook and a static implementation.
//!
//! ChewCrew doesn't implement venue search itself. It defines the
//! [`PlaceProvider`] trait: list the categories worth voting on, and
//! resolve a winning category to a venue. Production deployments back
//! this with a real search API; development and tests use
//! [`StaticPlaces`].

use std::collections::HashMap;

use crate::{Category, Place, PlaceError, PlaceOptions};

/// Supplies a room's choices and resolves its winner to a venue.
///
/// # Trait bounds
///
/// - `Send + Sync` → one provider is shared by every request task.
/// - `'static` → it lives as long as the server.
///
/// # Example
///
/// ```rust
/// use chewcrew_places::{Category, Place, PlaceError, PlaceOptions, PlaceProvider};
///
/// /// Always votes between two options and sends everyone home.
/// struct HomeCooking;
///
/// impl PlaceProvider for HomeCooking {
///     async fn categories(
///         &self,
///         _options: &PlaceOptions,
///     ) -> Result<Vec<Category>, PlaceError> {
///         Ok(vec!["pasta".into(), "soup".into()])
///     }
///
///     async fn resolve(
///         &self,
///         _options: &PlaceOptions,
///         category: &Category,
///     ) -> Result<Place, PlaceError> {
///         Ok(Place(format!("{category} at home")))
///     }
/// }
/// ```
pub trait PlaceProvider: Send + Sync + 'static {
    /// Returns the ordered categories a new room will vote over.
    ///
    /// The order is significant: it is the declaration order used to
    /// break ties when the room is tallied.
    fn categories(
        &self,
        options: &PlaceOptions,
    ) -> impl std::future::Future<Output = Result<Vec<Category>, PlaceError>>
    + Send;

    /// Finds a concrete venue for the winning `category`.
    ///
    /// # Returns
    /// - `Ok(Place)`: where the group is going
    /// - `Err(PlaceError::NoPlaceFound)`: nothing matches the category
    /// - `Err(PlaceError::Unavailable)`: the backing service failed
    fn resolve(
        &self,
        options: &PlaceOptions,
        category: &Category,
    ) -> impl std::future::Future<Output = Result<Place, PlaceError>> + Send;
}

// ---------------------------------------------------------------------------
// StaticPlaces
// ---------------------------------------------------------------------------

/// A [`PlaceProvider`] backed by a fixed category list.
///
/// `resolve` returns the venue registered for a category with
/// [`with_venue`](Self::with_venue), or echoes the category name when
/// none is registered. Categories outside the list are not found.
#[derive(Debug, Clone)]
pub struct StaticPlaces {
    categories: Vec<Category>,
    venues: HashMap<Category, Place>,
}

impl StaticPlaces {
    /// Creates a provider offering `categories` in the given order.
    pub fn new<I, C>(categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            venues: HashMap::new(),
        }
    }

    /// Registers the venue returned when `category` wins.
    pub fn with_venue(
        mut self,
        category: impl Into<Category>,
        place: impl Into<String>,
    ) -> Self {
        self.venues.insert(category.into(), Place(place.into()));
        self
    }

    /// Returns the configured categories.
    pub fn category_list(&self) -> &[Category] {
        &self.categories
    }
}

impl PlaceProvider for StaticPlaces {
    async fn categories(
        &self,
        options: &PlaceOptions,
    ) -> Result<Vec<Category>, PlaceError> {
        tracing::debug!(
            address = %options.address,
            count = self.categories.len(),
            "listing static categories"
        );
        Ok(self.categories.clone())
    }

    async fn resolve(
        &self,
        _options: &PlaceOptions,
        category: &Category,
    ) -> Result<Place, PlaceError> {
        if !self.categories.contains(category) {
            return Err(PlaceError::NoPlaceFound(category.clone()));
        }
        Ok(self
            .venues
            .get(category)
            .cloned()
            .unwrap_or_else(|| Place(category.0.clone())))
    }
}
