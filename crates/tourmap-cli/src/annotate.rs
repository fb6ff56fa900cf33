//! `annotate`: run the map controller against a headless surface.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tourmap_core::{AppConfig, Coordinate, LatLngBounds, MarkerDescriptor};
use tourmap_map::{
    HeadlessMap, HttpScriptSource, LoadOutcome, MapAnnotationController, MapSurface, MarkerIcon,
    PanelView, ScriptLoader, SelectOutcome, ZoomPolicy,
};
use tourmap_places::{ListingClient, PlaceDetailCache, PlacesClient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MarkerSource {
    File(PathBuf),
    Destination(i64),
}

#[derive(Debug, Serialize)]
struct AnnotateReport {
    markers: usize,
    without_details: usize,
    center: Option<Coordinate>,
    zoom: f64,
    visible: Option<BoundsReport>,
    selections: Vec<SelectionReport>,
}

#[derive(Debug, Serialize)]
struct BoundsReport {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

#[derive(Debug, Serialize)]
struct SelectionReport {
    index: usize,
    outcome: String,
    place_id: Option<String>,
    title: Option<String>,
}

impl From<LatLngBounds> for BoundsReport {
    fn from(b: LatLngBounds) -> Self {
        Self {
            south: b.south,
            west: b.west,
            north: b.north,
            east: b.east,
        }
    }
}

/// Resolve the marker list for an annotate run.
///
/// # Errors
///
/// Returns an error if the markers file is unreadable or invalid, or the
/// listing API request fails.
pub(crate) async fn load_marker_source(
    config: &AppConfig,
    source: &MarkerSource,
) -> anyhow::Result<Vec<MarkerDescriptor>> {
    match source {
        MarkerSource::File(path) => Ok(tourmap_core::load_markers(path)?),
        MarkerSource::Destination(id) => {
            let listing = ListingClient::new(&config.listing_api_url, config.request_timeout_secs)
                .map_err(|e| anyhow::anyhow!("failed to build listing client: {e}"))?;
            let destination = listing.get_destination(*id).await?;
            let markers = destination.markers();
            tracing::info!(
                destination_id = destination.id,
                name = %destination.name,
                markers = markers.len(),
                "loaded destination"
            );
            Ok(markers)
        }
    }
}

/// Load markers, apply each selection in order and print the result.
///
/// # Errors
///
/// Returns an error if the markers cannot be resolved, the map script fails
/// to load, or a selection names an index with no marker.
pub(crate) async fn run_annotate(
    config: &AppConfig,
    source: MarkerSource,
    selections: &[usize],
    json: bool,
) -> anyhow::Result<()> {
    let markers = load_marker_source(config, &source).await?;

    let places = Arc::new(
        PlacesClient::with_base_url(
            &config.maps_api_key,
            config.request_timeout_secs,
            &config.maps_base_url,
        )
        .map_err(|e| anyhow::anyhow!("failed to build places client: {e}"))?,
    );
    let sdk = HttpScriptSource::new(config.request_timeout_secs)?;
    let loader = Arc::new(ScriptLoader::new(
        Arc::new(sdk),
        &config.maps_base_url,
        &config.maps_api_key,
        &config.map_libraries,
    )?);
    let map = Arc::new(HeadlessMap::new(config.viewport));
    let controller = MapAnnotationController::new(
        loader,
        Arc::new(PlaceDetailCache::new()),
        places,
        Arc::clone(&map) as Arc<dyn MapSurface>,
        ZoomPolicy::from_config(config),
    );

    let outcome = match controller.load(markers).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "failed to load map");
            return Err(e.into());
        }
    };
    let (marker_count, without_details) = match outcome {
        LoadOutcome::Loaded {
            markers,
            without_details,
        } => (markers, without_details),
        LoadOutcome::Unchanged | LoadOutcome::Superseded => (0, 0),
    };

    let mut reports = Vec::with_capacity(selections.len() + 1);
    if let Some(index) = controller.selected_index() {
        reports.push(selection_report(&controller, index, "default"));
    }
    for &index in selections {
        let outcome = controller.click(index).await?;
        reports.push(selection_report(&controller, index, outcome_label(outcome)));
    }

    if json {
        let report = AnnotateReport {
            markers: marker_count,
            without_details,
            center: map.center(),
            zoom: map.zoom(),
            visible: map.visible_bounds().map(BoundsReport::from),
            selections: reports,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_map(&map, marker_count, without_details);
        for report in &reports {
            println!();
            println!("select {} ({})", report.index, report.outcome);
        }
        println!();
        match controller.panel() {
            Some(panel) => println!("{panel}"),
            None => println!("(panel hidden)"),
        }
    }

    controller.teardown();
    Ok(())
}

fn selection_report<L>(
    controller: &MapAnnotationController<L>,
    index: usize,
    outcome: &str,
) -> SelectionReport {
    let panel: Option<PanelView> = controller.panel();
    SelectionReport {
        index,
        outcome: outcome.to_owned(),
        place_id: panel.as_ref().map(|p| p.place_id.clone()),
        title: panel.map(|p| p.title),
    }
}

fn outcome_label(outcome: SelectOutcome) -> &'static str {
    match outcome {
        SelectOutcome::Ignored => "already selected",
        SelectOutcome::Shown => "shown",
        SelectOutcome::Stale => "stale",
        SelectOutcome::Unavailable => "details unavailable",
    }
}

fn print_map(map: &HeadlessMap, marker_count: usize, without_details: usize) {
    println!("markers: {marker_count} ({without_details} without details)");
    if let Some(center) = map.center() {
        println!("center : {:.5}, {:.5}", center.lat, center.lng);
    }
    println!("zoom   : {}", map.zoom());
    if let Some(b) = map.visible_bounds() {
        println!(
            "visible: S {:.5} W {:.5} N {:.5} E {:.5}",
            b.south, b.west, b.north, b.east
        );
    }
    for (id, marker) in map.markers() {
        let mark = if marker.icon == MarkerIcon::Selected { '*' } else { ' ' };
        println!(
            " {mark} {id} at {:.5}, {:.5}",
            marker.position.lat, marker.position.lng
        );
    }
}
