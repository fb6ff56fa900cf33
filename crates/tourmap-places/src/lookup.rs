//! The place lookup seam consumed by the detail cache.

use std::future::Future;

use tourmap_core::PlaceDetails;

use crate::client::PlacesClient;
use crate::error::PlacesError;

/// Fields requested for every marker's place details.
pub const DETAIL_FIELDS: &[&str] = &[
    "business_status",
    "photos",
    "name",
    "opening_hours",
    "rating",
    "types",
    "adr_address",
    "formatted_phone_number",
    "user_ratings_total",
    "geometry",
    "website",
    "formatted_address",
];

/// Resolves a place identifier to its details.
///
/// Implementations report a non-OK service status through
/// [`PlaceDetails::status`] and reserve `Err` for transport failures.
pub trait PlaceLookupService: Send + Sync {
    fn place_details(
        &self,
        place_id: &str,
        fields: &[&str],
    ) -> impl Future<Output = Result<PlaceDetails, PlacesError>> + Send;
}

impl PlaceLookupService for PlacesClient {
    async fn place_details(
        &self,
        place_id: &str,
        fields: &[&str],
    ) -> Result<PlaceDetails, PlacesError> {
        self.fetch_details(place_id, fields).await
    }
}
