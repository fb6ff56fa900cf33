//! Keyed memo of place details, shared by every map on the page.
//!
//! Entries are never evicted or replaced except by a later fetch of the same
//! key. Two callers that miss on the same uncached key at the same time both
//! hit the lookup service; whichever finishes last owns the entry. Results for
//! one place are stable within a session, so the duplicate call only costs a
//! request.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tourmap_core::{MarkerDescriptor, PlaceDetails};

use crate::error::PlacesError;
use crate::lookup::{PlaceLookupService, DETAIL_FIELDS};

#[derive(Debug, Default)]
pub struct PlaceDetailCache {
    entries: Mutex<HashMap<String, PlaceDetails>>,
}

impl PlaceDetailCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached details for `descriptor`, fetching them through
    /// `service` on a miss.
    ///
    /// Degraded answers (non-OK service status) are cached like any other.
    ///
    /// # Errors
    ///
    /// Propagates the lookup service's transport error. Nothing is cached in
    /// that case, so a later call fetches again.
    pub async fn get_details<L>(
        &self,
        descriptor: &MarkerDescriptor,
        service: &L,
    ) -> Result<PlaceDetails, PlacesError>
    where
        L: PlaceLookupService,
    {
        self.get_by_place_id(&descriptor.place_id, service).await
    }

    /// [`PlaceDetailCache::get_details`] for a bare place id, when no marker
    /// coordinate is at hand.
    ///
    /// # Errors
    ///
    /// Same as [`PlaceDetailCache::get_details`].
    pub async fn get_by_place_id<L>(
        &self,
        place_id: &str,
        service: &L,
    ) -> Result<PlaceDetails, PlacesError>
    where
        L: PlaceLookupService,
    {
        if let Some(hit) = self.peek(place_id) {
            tracing::debug!(place_id, "place details cache hit");
            return Ok(hit);
        }

        let details = service.place_details(place_id, DETAIL_FIELDS).await?;
        if details.is_degraded() {
            tracing::warn!(
                place_id,
                status = %details.status,
                "caching degraded place details"
            );
        }

        self.lock().insert(place_id.to_owned(), details.clone());
        Ok(details)
    }

    /// Cached details for `place_id`, without touching the lookup service.
    #[must_use]
    pub fn peek(&self, place_id: &str) -> Option<PlaceDetails> {
        self.lock().get(place_id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PlaceDetails>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, Ordering};

    use tourmap_core::PlaceStatus;

    use super::*;

    /// Lookup fake: counts calls, answers OK unless the id is listed as
    /// missing (degraded) or broken (transport error).
    #[derive(Default)]
    struct FakeLookup {
        calls: AtomicU32,
        missing: HashSet<String>,
        broken: HashSet<String>,
    }

    impl PlaceLookupService for FakeLookup {
        async fn place_details(
            &self,
            place_id: &str,
            fields: &[&str],
        ) -> Result<PlaceDetails, PlacesError> {
            assert_eq!(fields, DETAIL_FIELDS);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.broken.contains(place_id) {
                return Err(PlacesError::Api("connection reset".to_owned()));
            }
            if self.missing.contains(place_id) {
                return Ok(PlaceDetails::degraded(place_id, PlaceStatus::NotFound));
            }
            let mut details = PlaceDetails::degraded(place_id, PlaceStatus::Ok);
            details.name = Some(format!("Place {place_id}"));
            details.rating = Some(4.5);
            Ok(details)
        }
    }

    fn marker(place_id: &str) -> MarkerDescriptor {
        MarkerDescriptor::new(place_id, -8.4, 115.1)
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let cache = PlaceDetailCache::new();
        let service = FakeLookup::default();

        let first = cache.get_details(&marker("A"), &service).await.unwrap();
        let second = cache.get_details(&marker("A"), &service).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn bare_place_id_shares_entries_with_marker_lookups() {
        let cache = PlaceDetailCache::new();
        let service = FakeLookup::default();

        let by_id = cache.get_by_place_id("A", &service).await.unwrap();
        let by_marker = cache.get_details(&marker("A"), &service).await.unwrap();

        assert_eq!(by_id, by_marker);
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_keys_are_fetched_separately() {
        let cache = PlaceDetailCache::new();
        let service = FakeLookup::default();

        cache.get_details(&marker("A"), &service).await.unwrap();
        cache.get_details(&marker("B"), &service).await.unwrap();

        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.peek("B").and_then(|d| d.name).as_deref(), Some("Place B"));
    }

    #[tokio::test]
    async fn degraded_result_is_cached_without_error() {
        let cache = PlaceDetailCache::new();
        let service = FakeLookup {
            missing: HashSet::from(["X".to_owned()]),
            ..FakeLookup::default()
        };

        let details = cache.get_details(&marker("X"), &service).await.unwrap();
        assert!(details.is_degraded());
        assert!(details.photos.is_empty());

        let again = cache.get_details(&marker("X"), &service).await.unwrap();
        assert_eq!(again.status, PlaceStatus::NotFound);
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transport_error_is_not_cached() {
        let cache = PlaceDetailCache::new();
        let service = FakeLookup {
            broken: HashSet::from(["Z".to_owned()]),
            ..FakeLookup::default()
        };

        assert!(cache.get_details(&marker("Z"), &service).await.is_err());
        assert!(cache.is_empty());
        assert!(cache.get_details(&marker("Z"), &service).await.is_err());
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_misses_both_fetch_and_leave_one_entry() {
        let cache = PlaceDetailCache::new();
        let service = FakeLookup::default();

        let first = marker("A");
        let second = marker("A");
        let (a, b) = tokio::join!(
            cache.get_details(&first, &service),
            cache.get_details(&second, &service),
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn clear_forgets_entries() {
        let cache = PlaceDetailCache::new();
        let service = FakeLookup::default();
        cache.get_details(&marker("A"), &service).await.unwrap();
        assert!(cache.peek("A").is_some());

        cache.clear();
        assert!(cache.is_empty());
        cache.get_details(&marker("A"), &service).await.unwrap();
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
    }
}
