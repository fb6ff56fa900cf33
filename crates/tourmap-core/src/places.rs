//! Place metadata as returned by the external place lookup service.

use serde::{Deserialize, Serialize};

use crate::markers::Coordinate;

/// Status code reported by the place lookup service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaceStatus {
    Ok,
    ZeroResults,
    NotFound,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    #[serde(other)]
    UnknownError,
}

impl PlaceStatus {
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == PlaceStatus::Ok
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceStatus::Ok => "OK",
            PlaceStatus::ZeroResults => "ZERO_RESULTS",
            PlaceStatus::NotFound => "NOT_FOUND",
            PlaceStatus::InvalidRequest => "INVALID_REQUEST",
            PlaceStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            PlaceStatus::RequestDenied => "REQUEST_DENIED",
            PlaceStatus::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl std::fmt::Display for PlaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    /// One human-readable line per weekday, e.g. `"Monday: 9:00 AM – 5:00 PM"`.
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub photo_reference: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub html_attributions: Vec<String>,
}

/// Cached metadata for one place.
///
/// Every field except `place_id` and `status` is optional: a lookup the
/// service answered with a non-OK status is kept as a degraded entry with
/// empty fields rather than surfaced as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub status: PlaceStatus,
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub opening_hours: Option<OpeningHours>,
    pub formatted_address: Option<String>,
    pub adr_address: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub location: Option<Coordinate>,
    pub photos: Vec<PhotoRef>,
    pub types: Vec<String>,
    pub business_status: Option<String>,
}

impl PlaceDetails {
    /// An entry carrying only the service's status.
    pub fn degraded(place_id: impl Into<String>, status: PlaceStatus) -> Self {
        Self {
            place_id: place_id.into(),
            status,
            name: None,
            rating: None,
            user_ratings_total: None,
            opening_hours: None,
            formatted_address: None,
            adr_address: None,
            phone_number: None,
            website: None,
            location: None,
            photos: Vec::new(),
            types: Vec::new(),
            business_status: None,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.status.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_codes() {
        let status: PlaceStatus = serde_json::from_str("\"NOT_FOUND\"").unwrap();
        assert_eq!(status, PlaceStatus::NotFound);
        let status: PlaceStatus = serde_json::from_str("\"OK\"").unwrap();
        assert!(status.is_ok());
    }

    #[test]
    fn status_maps_unknown_codes_to_unknown_error() {
        let status: PlaceStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(status, PlaceStatus::UnknownError);
    }

    #[test]
    fn degraded_entry_is_empty() {
        let details = PlaceDetails::degraded("X", PlaceStatus::NotFound);
        assert!(details.is_degraded());
        assert!(details.name.is_none());
        assert!(details.photos.is_empty());
        assert_eq!(details.status.to_string(), "NOT_FOUND");
    }
}
