//! `destinations`: one page of the listing API's destination index.

use serde::Serialize;
use tourmap_core::AppConfig;
use tourmap_places::{Destination, DestinationPage, ListingClient};

#[derive(Debug, Serialize)]
struct DestinationRow {
    id: i64,
    name: String,
    locations: usize,
    markers: usize,
    updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
struct DestinationsReport {
    page: u32,
    last_page: Option<u32>,
    total: Option<u64>,
    destinations: Vec<DestinationRow>,
}

impl From<&Destination> for DestinationRow {
    fn from(d: &Destination) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            locations: d.locations.len(),
            markers: d.markers().len(),
            updated_at: d.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

fn build_report(requested: u32, page: &DestinationPage) -> DestinationsReport {
    DestinationsReport {
        page: page.meta.as_ref().map_or(requested, |m| m.current_page),
        last_page: page.meta.as_ref().map(|m| m.last_page),
        total: page.meta.as_ref().map(|m| m.total),
        destinations: page.destinations.iter().map(DestinationRow::from).collect(),
    }
}

/// # Errors
///
/// Returns an error if the listing client cannot be built or the request
/// fails.
pub(crate) async fn run_destinations(
    config: &AppConfig,
    page: u32,
    json: bool,
) -> anyhow::Result<()> {
    let listing = ListingClient::new(&config.listing_api_url, config.request_timeout_secs)
        .map_err(|e| anyhow::anyhow!("failed to build listing client: {e}"))?;
    let result = listing.list_destinations(page).await?;
    let report = build_report(page, &result);
    tracing::info!(
        page = report.page,
        destinations = report.destinations.len(),
        "listed destinations"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for row in &report.destinations {
        println!(
            "{:>6}  {}  ({} locations, {} mappable){}",
            row.id,
            row.name,
            row.locations,
            row.markers,
            row.updated_at
                .as_deref()
                .map(|t| format!("  updated {t}"))
                .unwrap_or_default()
        );
    }
    match (report.last_page, report.total) {
        (Some(last), Some(total)) => {
            println!("page {} of {last}, {total} destinations", report.page);
        }
        _ => println!("page {}", report.page),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tourmap_places::{ListingLocation, PageMeta};

    use super::*;

    fn destination(id: i64, place_ids: &[Option<&str>]) -> Destination {
        Destination {
            id,
            name: format!("Destination {id}"),
            slug: None,
            locations: place_ids
                .iter()
                .enumerate()
                .map(|(i, place_id)| ListingLocation {
                    id: i64::try_from(i).unwrap(),
                    name: None,
                    place_id: place_id.map(ToOwned::to_owned),
                    latitude: Some(-8.5),
                    longitude: Some(115.26),
                })
                .collect(),
            updated_at: None,
        }
    }

    #[test]
    fn report_counts_mappable_locations_and_reads_page_meta() {
        let page = DestinationPage {
            destinations: vec![destination(1, &[Some("A"), None]), destination(2, &[])],
            meta: Some(PageMeta {
                current_page: 3,
                last_page: 4,
                per_page: 2,
                total: 8,
            }),
        };

        let report = build_report(1, &page);
        assert_eq!(report.page, 3);
        assert_eq!(report.last_page, Some(4));
        assert_eq!(report.total, Some(8));
        assert_eq!(report.destinations[0].locations, 2);
        assert_eq!(report.destinations[0].markers, 1);
        assert_eq!(report.destinations[1].markers, 0);
    }

    #[test]
    fn report_without_meta_keeps_requested_page() {
        let page = DestinationPage {
            destinations: Vec::new(),
            meta: None,
        };

        let report = build_report(2, &page);
        assert_eq!(report.page, 2);
        assert!(report.last_page.is_none());
        assert!(report.total.is_none());
    }
}
