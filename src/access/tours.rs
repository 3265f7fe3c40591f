use std::sync::Arc;
use async_trait::async_trait;
use uuid::Uuid;
use crate::access::pagination::{PageQuery, PageResult};
use crate::errors::StateError;
use crate::validate::{check_image, check_tour_name};

///
/// A tour as shown in the listings. Decoded 1:1 from a stored document, where `id` is the document id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tour {
    pub id: String,
    pub name: String,
    /// Human readable duration, like `"14 days"`
    pub duration: String,
    /// Cover image URL
    pub image: String,
}

impl Tour {
    pub fn new<S: Into<String>>(name: S, duration: S, image: S) -> Self {
        Tour {
            id: String::new(),
            name: name.into(),
            duration: duration.into(),
            image: image.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), StateError> {
        check_tour_name(self.name.as_str())?;
        check_image(self.image.as_str())?;
        Ok(())
    }
}

///
/// Query primitives of a document store holding tours. Everything is ordered by the tour name
/// ascending, with no secondary order defined by the API (a store may break ties by document id).
#[async_trait]
pub trait TourQueries: Send + Sync {

    ///
    /// Read up to `page.limit` tours ordered by name, starting right after `page.cursor` if it's set.
    /// The returned cursor points to the last returned tour and can be used to request the next page.
    async fn list_by_name(&self, page: PageQuery) -> Result<PageResult<Tour>, StateError>;

    ///
    /// Read up to `limit` tours with `from <= name < to`, ordered by name.
    async fn range_by_name(&self, from: &str, to: &str, limit: usize) -> Result<Vec<Tour>, StateError>;
}

/// Shared handle to a store, so a single store connection can serve many listing sessions
#[async_trait]
impl<T: TourQueries + ?Sized> TourQueries for Arc<T> {
    async fn list_by_name(&self, page: PageQuery) -> Result<PageResult<Tour>, StateError> {
        (**self).list_by_name(page).await
    }

    async fn range_by_name(&self, from: &str, to: &str, limit: usize) -> Result<Vec<Tour>, StateError> {
        (**self).range_by_name(from, to, limit).await
    }
}

///
/// Maintenance of the stored tours
pub trait TourRecords {

    ///
    /// Add new tours or replace existing ones.
    /// If a tour doesn't have a valid UUID as its id it's treated as a new one and gets a new random id,
    /// otherwise the stored tour with the same id is replaced.
    /// Returns list of IDs of created/updated tours, in the same order.
    fn add(&self, items: Vec<Tour>) -> Result<Vec<Uuid>, StateError>;

    ///
    /// Get a tour if it exists.
    /// Returns `Ok(Some)` when it exists, or `Ok(None)` if not. Or `Err(StateError)` if cannot read
    fn get(&self, id: Uuid) -> Result<Option<Tour>, StateError>;

    ///
    /// Remove a tour with the specified id, if it exists. Otherwise does nothing, returns ok in both cases.
    fn remove(&self, id: Uuid) -> Result<(), StateError>;
}
