//! Drives one interactive map: loads the SDK, places a marker per
//! descriptor, fits the viewport and keeps the selection and side panel in
//! step with marker clicks.
//!
//! All mutable state sits behind one mutex that is never held across an
//! `.await`. Every async operation snapshots what it needs, suspends, and
//! re-checks on resumption that the controller is still active and that the
//! marker generation and selection token it started from are still current.
//! Results that fail the check are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use tourmap_core::{AppConfig, LatLngBounds, MarkerDescriptor};
use tourmap_places::{PlaceDetailCache, PlaceLookupService};

use crate::error::MapError;
use crate::loader::ScriptLoader;
use crate::panel::PanelView;
use crate::registry::{MarkerRegistry, RegisteredMarker};
use crate::selection::{Selection, SelectionState};
use crate::surface::{MapSurface, MarkerIcon, MarkerId};

/// Zoom levels applied after fitting the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPolicy {
    /// Ceiling applied once after fitting more than one marker.
    pub max_fit_zoom: f64,
    /// Zoom used when exactly one marker is placed.
    pub single_marker_zoom: f64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            max_fit_zoom: 15.0,
            single_marker_zoom: 17.0,
        }
    }
}

impl ZoomPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_fit_zoom: config.max_fit_zoom,
            single_marker_zoom: config.single_marker_zoom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The list equals the one already loaded; nothing was touched.
    Unchanged,
    /// Markers were placed. `without_details` counts markers whose lookup
    /// failed; they are on the map but have no panel until a later lookup
    /// succeeds.
    Loaded {
        markers: usize,
        without_details: usize,
    },
    /// A newer `load` started before this one finished. Markers this call
    /// created have been removed again.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The marker was already selected.
    Ignored,
    /// Details resolved and the panel now shows them.
    Shown,
    /// Details resolved after the selection moved on; they were dropped.
    Stale,
    /// The lookup failed; the marker stays selected with the panel hidden.
    Unavailable,
}

struct ControllerState {
    active: bool,
    list_version: u64,
    requested: Option<Vec<MarkerDescriptor>>,
    registry: MarkerRegistry,
    selection: Selection,
}

pub struct MapAnnotationController<L> {
    loader: Arc<ScriptLoader>,
    cache: Arc<PlaceDetailCache>,
    lookup: Arc<L>,
    surface: Arc<dyn MapSurface>,
    zoom: ZoomPolicy,
    state: Mutex<ControllerState>,
}

impl<L> MapAnnotationController<L> {
    #[must_use]
    pub fn new(
        loader: Arc<ScriptLoader>,
        cache: Arc<PlaceDetailCache>,
        lookup: Arc<L>,
        surface: Arc<dyn MapSurface>,
        zoom: ZoomPolicy,
    ) -> Self {
        Self {
            loader,
            cache,
            lookup,
            surface,
            zoom,
            state: Mutex::new(ControllerState {
                active: true,
                list_version: 0,
                requested: None,
                registry: MarkerRegistry::default(),
                selection: Selection::new(),
            }),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    #[must_use]
    pub fn selection(&self) -> SelectionState {
        self.lock().selection.state().clone()
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.lock().selection.selected_index()
    }

    /// The side panel, or `None` while it is hidden.
    #[must_use]
    pub fn panel(&self) -> Option<PanelView> {
        self.lock().selection.details().map(PanelView::from_details)
    }

    #[must_use]
    pub fn markers(&self) -> Vec<RegisteredMarker> {
        self.lock().registry.iter().cloned().collect()
    }

    #[must_use]
    pub fn marker_ids(&self) -> Vec<MarkerId> {
        self.lock().registry.iter().map(|m| m.id).collect()
    }

    /// Removes every marker, hides the panel and deactivates the controller.
    /// Operations still in flight discard their results. Idempotent.
    pub fn teardown(&self) {
        let mut state = self.lock();
        if !state.active {
            return;
        }
        state.active = false;
        state.list_version += 1;
        state.registry.dispose(self.surface.as_ref());
        state.selection.reset();
        state.requested = None;
        tracing::debug!("map controller torn down");
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<L> MapAnnotationController<L>
where
    L: PlaceLookupService,
{
    /// Replaces the markers on the map with one per descriptor.
    ///
    /// Details for every descriptor are fetched concurrently and each marker
    /// is created once its lookup settles, successful or not. When all are
    /// placed the viewport is fitted and the first marker selected.
    ///
    /// # Errors
    ///
    /// - [`MapError::ScriptLoad`] if the map SDK could not be loaded.
    /// - [`MapError::TornDown`] if the controller was torn down before or
    ///   during the load.
    pub async fn load(&self, descriptors: Vec<MarkerDescriptor>) -> Result<LoadOutcome, MapError> {
        {
            let state = self.lock();
            if !state.active {
                return Err(MapError::TornDown);
            }
            if state.requested.as_ref() == Some(&descriptors) {
                tracing::debug!(markers = descriptors.len(), "marker list unchanged");
                return Ok(LoadOutcome::Unchanged);
            }
        }

        self.loader.ensure_loaded().await?;

        let version = {
            let mut state = self.lock();
            if !state.active {
                return Err(MapError::TornDown);
            }
            state.list_version += 1;
            state.registry.dispose(self.surface.as_ref());
            state.selection.reset();
            state.requested = Some(descriptors.clone());
            state.list_version
        };

        let placements = descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| self.place_marker(version, index, descriptor));
        let results = join_all(placements).await;

        let mut without_details = 0;
        let mut placed = Vec::with_capacity(results.len());
        for (marker, resolved) in results.into_iter().flatten() {
            if !resolved {
                without_details += 1;
            }
            placed.push(marker);
        }

        {
            let mut state = self.lock();
            if !state.active || state.list_version != version {
                for marker in &placed {
                    self.surface.remove_marker(marker.id);
                }
                if !state.active {
                    return Err(MapError::TornDown);
                }
                tracing::debug!(version, "marker load superseded");
                return Ok(LoadOutcome::Superseded);
            }

            let registry = MarkerRegistry::new(version, placed);
            self.fit_viewport(&registry);
            state.registry = registry;
        }

        let markers = descriptors.len();
        if without_details > 0 {
            tracing::warn!(markers, without_details, "some markers have no place details");
        }
        tracing::info!(markers, version, "markers loaded");

        if markers > 0 {
            match self.select(0).await {
                Ok(SelectOutcome::Stale) | Err(MapError::UnknownMarker { .. }) => {
                    tracing::debug!("default selection superseded");
                }
                Ok(outcome) => tracing::debug!(?outcome, "default selection applied"),
                Err(e) => return Err(e),
            }
        }

        Ok(LoadOutcome::Loaded {
            markers,
            without_details,
        })
    }

    /// Marker click handler.
    ///
    /// # Errors
    ///
    /// Same as [`MapAnnotationController::select`].
    pub async fn click(&self, index: usize) -> Result<SelectOutcome, MapError> {
        self.select(index).await
    }

    /// Selects the marker at `index` and shows its details once they resolve.
    ///
    /// Every other marker is restyled as unselected right away. The selected
    /// icon is applied only after the details arrive, and only if nothing
    /// else was selected in the meantime.
    ///
    /// # Errors
    ///
    /// - [`MapError::TornDown`] if the controller was torn down.
    /// - [`MapError::UnknownMarker`] if no marker has that index.
    pub async fn select(&self, index: usize) -> Result<SelectOutcome, MapError> {
        let (token, version, marker) = {
            let mut state = self.lock();
            if !state.active {
                return Err(MapError::TornDown);
            }
            let Some(marker) = state.registry.get(index).cloned() else {
                return Err(MapError::UnknownMarker {
                    index,
                    len: state.registry.len(),
                });
            };
            let Some(token) = state.selection.begin(index, marker.descriptor.clone()) else {
                tracing::debug!(index, "marker already selected");
                return Ok(SelectOutcome::Ignored);
            };
            state
                .registry
                .restyle_all(self.surface.as_ref(), MarkerIcon::Unselected);
            (token, state.registry.version(), marker)
        };

        let place_id = marker.descriptor.place_id.as_str();
        let result = self
            .cache
            .get_details(&marker.descriptor, self.lookup.as_ref())
            .await;

        let mut state = self.lock();
        if !state.active
            || state.registry.version() != version
            || !state.selection.is_current(token)
        {
            tracing::debug!(index, place_id, "discarding stale place details");
            return Ok(SelectOutcome::Stale);
        }

        match result {
            Ok(details) => {
                state.selection.resolve(token, details);
                self.surface.set_marker_icon(marker.id, MarkerIcon::Selected);
                Ok(SelectOutcome::Shown)
            }
            Err(e) => {
                tracing::warn!(index, place_id, error = %e, "place details unavailable");
                Ok(SelectOutcome::Unavailable)
            }
        }
    }

    /// Fetches details for one descriptor, then places its marker unless the
    /// load was superseded meanwhile. The flag reports whether details were
    /// obtained.
    async fn place_marker(
        &self,
        version: u64,
        index: usize,
        descriptor: &MarkerDescriptor,
    ) -> Option<(RegisteredMarker, bool)> {
        let resolved = match self
            .cache
            .get_details(descriptor, self.lookup.as_ref())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    index,
                    place_id = %descriptor.place_id,
                    error = %e,
                    "place details lookup failed, placing marker anyway"
                );
                false
            }
        };

        let state = self.lock();
        if !state.active || state.list_version != version {
            return None;
        }
        let id = self
            .surface
            .add_marker(descriptor.coordinate, MarkerIcon::Unselected);
        drop(state);

        Some((
            RegisteredMarker {
                index,
                descriptor: descriptor.clone(),
                id,
            },
            resolved,
        ))
    }

    /// A lone marker is centered at the fixed single-marker zoom; a point has
    /// no extent to fit.
    fn fit_viewport(&self, registry: &MarkerRegistry) {
        if registry.len() == 1 {
            if let Some(only) = registry.iter().next() {
                self.surface.set_center(only.descriptor.coordinate);
                self.surface.set_zoom(self.zoom.single_marker_zoom);
            }
            return;
        }
        let Some(bounds) =
            LatLngBounds::from_coordinates(registry.iter().map(|m| m.descriptor.coordinate))
        else {
            return;
        };
        let settled = self.surface.fit_bounds(&bounds);
        if settled > self.zoom.max_fit_zoom {
            tracing::debug!(settled, max = self.zoom.max_fit_zoom, "clamping fitted zoom");
            self.surface.set_zoom(self.zoom.max_fit_zoom);
        }
    }
}

impl<L> Drop for MapAnnotationController<L> {
    fn drop(&mut self) {
        self.teardown();
    }
}
