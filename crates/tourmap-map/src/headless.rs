//! In-memory [`MapSurface`] that tracks markers and the viewport without
//! drawing anything. Backs the CLI and the controller tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tourmap_core::{
    fit_zoom, mercator_center, visible_bounds, Coordinate, LatLngBounds, Viewport,
};

use crate::surface::{MapSurface, MarkerIcon, MarkerId};

const INITIAL_ZOOM: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessMarker {
    pub position: Coordinate,
    pub icon: MarkerIcon,
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_id: u64,
    markers: BTreeMap<MarkerId, HeadlessMarker>,
    center: Option<Coordinate>,
    zoom: Option<f64>,
    last_fit: Option<LatLngBounds>,
}

#[derive(Debug)]
pub struct HeadlessMap {
    viewport: Viewport,
    state: Mutex<HeadlessState>,
}

impl HeadlessMap {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            state: Mutex::new(HeadlessState::default()),
        }
    }

    /// Live markers in creation order.
    #[must_use]
    pub fn markers(&self) -> Vec<(MarkerId, HeadlessMarker)> {
        self.lock().markers.iter().map(|(id, m)| (*id, *m)).collect()
    }

    #[must_use]
    pub fn marker(&self, id: MarkerId) -> Option<HeadlessMarker> {
        self.lock().markers.get(&id).copied()
    }

    #[must_use]
    pub fn center(&self) -> Option<Coordinate> {
        self.lock().center
    }

    /// Bounds passed to the most recent [`MapSurface::fit_bounds`].
    #[must_use]
    pub fn last_fit(&self) -> Option<LatLngBounds> {
        self.lock().last_fit
    }

    /// Region currently on screen, or `None` before anything centered the map.
    #[must_use]
    pub fn visible_bounds(&self) -> Option<LatLngBounds> {
        let state = self.lock();
        let center = state.center?;
        Some(visible_bounds(
            center,
            state.zoom.unwrap_or(INITIAL_ZOOM),
            self.viewport,
        ))
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MapSurface for HeadlessMap {
    fn add_marker(&self, position: Coordinate, icon: MarkerIcon) -> MarkerId {
        let mut state = self.lock();
        state.next_id += 1;
        let id = MarkerId(state.next_id);
        state.markers.insert(id, HeadlessMarker { position, icon });
        id
    }

    fn remove_marker(&self, id: MarkerId) {
        self.lock().markers.remove(&id);
    }

    fn set_marker_icon(&self, id: MarkerId, icon: MarkerIcon) {
        if let Some(marker) = self.lock().markers.get_mut(&id) {
            marker.icon = icon;
        }
    }

    fn fit_bounds(&self, bounds: &LatLngBounds) -> f64 {
        let zoom = fit_zoom(bounds, self.viewport);
        let mut state = self.lock();
        state.center = Some(mercator_center(bounds));
        state.zoom = Some(zoom);
        state.last_fit = Some(*bounds);
        zoom
    }

    fn set_center(&self, center: Coordinate) {
        self.lock().center = Some(center);
    }

    fn set_zoom(&self, zoom: f64) {
        self.lock().zoom = Some(zoom);
    }

    fn zoom(&self) -> f64 {
        self.lock().zoom.unwrap_or(INITIAL_ZOOM)
    }
}
