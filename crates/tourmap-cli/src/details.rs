//! `details`: one cached place lookup, printed as a panel.

use tourmap_core::AppConfig;
use tourmap_map::PanelView;
use tourmap_places::{PlaceDetailCache, PlacesClient};

/// # Errors
///
/// Returns an error if the places client cannot be built or the lookup
/// fails in transport. A non-OK service status still prints a panel.
pub(crate) async fn run_details(
    config: &AppConfig,
    place_id: &str,
    photo_width: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let client = PlacesClient::with_base_url(
        &config.maps_api_key,
        config.request_timeout_secs,
        &config.maps_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build places client: {e}"))?;

    let cache = PlaceDetailCache::new();
    let details = cache.get_by_place_id(place_id, &client).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    let mut panel = PanelView::from_details(&details);
    if let Some(width) = photo_width {
        panel = panel.with_photo_urls(|reference| {
            client
                .photo_url(reference, width)
                .map_or_else(|_| reference.to_owned(), |url| url.to_string())
        });
    }
    println!("{panel}");
    Ok(())
}
