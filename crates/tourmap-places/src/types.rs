//! Place Details API response types.
//!
//! The service wraps every answer in `{"status": "...", "result": {...}}`;
//! `result` is absent whenever `status` is not `"OK"`.

use serde::Deserialize;
use tourmap_core::{Coordinate, OpeningHours, PhotoRef, PlaceDetails, PlaceStatus};

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: PlaceStatus,
    #[serde(default)]
    pub result: Option<PlaceResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub adr_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub business_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: Coordinate,
}

impl DetailsResponse {
    /// Flatten the wire response into a [`PlaceDetails`] for `place_id`.
    ///
    /// A non-OK status yields a degraded entry even if the service sent a
    /// partial `result`.
    #[must_use]
    pub fn into_details(self, place_id: &str) -> PlaceDetails {
        if !self.status.is_ok() {
            return PlaceDetails::degraded(place_id, self.status);
        }
        let result = self.result.unwrap_or_default();
        PlaceDetails {
            place_id: place_id.to_owned(),
            status: self.status,
            name: result.name,
            rating: result.rating,
            user_ratings_total: result.user_ratings_total,
            opening_hours: result.opening_hours,
            formatted_address: result.formatted_address,
            adr_address: result.adr_address,
            phone_number: result.formatted_phone_number,
            website: result.website,
            location: result.geometry.map(|g| g.location),
            photos: result.photos,
            types: result.types,
            business_status: result.business_status,
        }
    }
}
