//! HTTP client for the Place Details web service.
//!
//! Wraps `reqwest` with API key management and typed response
//! deserialization. A non-OK service status is not an error here: it comes
//! back as a degraded [`PlaceDetails`] so callers can cache and render it.

use std::time::Duration;

use reqwest::{Client, Url};
use tourmap_core::PlaceDetails;

use crate::error::PlacesError;
use crate::types::DetailsResponse;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";
const DETAILS_PATH: &str = "maps/api/place/details/json";
const PHOTO_PATH: &str = "maps/api/place/photo";

/// Client for the Place Details web service.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a new client pointed at the production service.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tourmap/0.1 (place-details)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: normalise_base_url(base_url)?,
        })
    }

    /// Fetches details for one place, requesting only `fields`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    ///   The request URL, which carries the API key, is stripped.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn fetch_details(
        &self,
        place_id: &str,
        fields: &[&str],
    ) -> Result<PlaceDetails, PlacesError> {
        let joined = fields.join(",");
        let url = self.build_url(DETAILS_PATH, &[("place_id", place_id), ("fields", &joined)])?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let parsed: DetailsResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("placeDetails(place_id={place_id})"),
                source: e,
            })?;

        if !parsed.status.is_ok() {
            tracing::warn!(
                place_id,
                status = %parsed.status,
                error_message = parsed.error_message.as_deref().unwrap_or(""),
                "place details returned non-OK status"
            );
        }

        Ok(parsed.into_details(place_id))
    }

    /// URL that serves the photo behind `photo_reference`, scaled to `max_width`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidBaseUrl`] if the path cannot be joined
    /// onto the base URL.
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> Result<Url, PlacesError> {
        self.build_url(
            PHOTO_PATH,
            &[
                ("maxwidth", &max_width.to_string()),
                ("photo_reference", photo_reference),
            ],
        )
    }

    /// Joins `path` onto the base URL and appends `key` plus `extra` as
    /// percent-encoded query pairs.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }
}

/// Parses `base_url`, ensuring it ends with exactly one slash so relative
/// joins append to the path instead of replacing its last segment.
pub(crate) fn normalise_base_url(base_url: &str) -> Result<Url, PlacesError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}
