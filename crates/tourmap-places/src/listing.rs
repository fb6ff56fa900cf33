//! Read-only client for the listing API's destination endpoints.
//!
//! Only the parts needed to turn a destination into map markers are
//! modelled. Every response arrives in a `{ success, message, data, meta }`
//! envelope.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer};
use tourmap_core::{Coordinate, MarkerDescriptor};

use crate::client::normalise_base_url;
use crate::error::PlacesError;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Destination {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub locations: Vec<ListingLocation>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingLocation {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct DestinationPage {
    pub destinations: Vec<Destination>,
    pub meta: Option<PageMeta>,
}

impl Destination {
    /// Marker descriptors for every location that has a place id and a
    /// valid coordinate, in listing order.
    #[must_use]
    pub fn markers(&self) -> Vec<MarkerDescriptor> {
        self.locations
            .iter()
            .filter_map(|loc| {
                let marker = loc.marker();
                if marker.is_none() {
                    tracing::debug!(
                        destination_id = self.id,
                        location_id = loc.id,
                        "skipping location without place id or coordinate"
                    );
                }
                marker
            })
            .collect()
    }
}

impl ListingLocation {
    #[must_use]
    pub fn marker(&self) -> Option<MarkerDescriptor> {
        let place_id = self.place_id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let coordinate = Coordinate::new(self.latitude?, self.longitude?);
        coordinate.is_valid().then(|| MarkerDescriptor {
            place_id: place_id.to_owned(),
            coordinate,
        })
    }
}

/// Accepts a JSON number, a numeric string, or null.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

pub struct ListingClient {
    client: Client,
    base_url: Url,
}

impl ListingClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tourmap/0.1 (listing)")
            .build()?;
        Ok(Self {
            client,
            base_url: normalise_base_url(base_url)?,
        })
    }

    /// Fetches one destination with its locations.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] if the envelope reports failure or has no data.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the envelope.
    pub async fn get_destination(&self, id: i64) -> Result<Destination, PlacesError> {
        let url = self.join(&format!("destinations/{id}"))?;
        let envelope: Envelope<Destination> = self.request(url, "getDestination").await?;
        let (data, _) = unwrap_envelope(envelope)?;
        Ok(data)
    }

    /// Fetches one page of the destination index.
    ///
    /// # Errors
    ///
    /// Same as [`ListingClient::get_destination`].
    pub async fn list_destinations(&self, page: u32) -> Result<DestinationPage, PlacesError> {
        let mut url = self.join("destinations")?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string());
        let envelope: Envelope<Vec<Destination>> = self.request(url, "listDestinations").await?;
        let (destinations, meta) = unwrap_envelope(envelope)?;
        Ok(DestinationPage { destinations, meta })
    }

    fn join(&self, path: &str) -> Result<Url, PlacesError> {
        self.base_url
            .join(path)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn request<T>(&self, url: Url, context: &str) -> Result<Envelope<T>, PlacesError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: format!("{context}({url})"),
            source: e,
        })
    }
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<(T, Option<PageMeta>), PlacesError> {
    if !envelope.success {
        return Err(PlacesError::Api(
            envelope
                .message
                .unwrap_or_else(|| "unknown error".to_owned()),
        ));
    }
    let data = envelope
        .data
        .ok_or_else(|| PlacesError::Api("response is missing data".to_owned()))?;
    Ok((data, envelope.meta))
}
