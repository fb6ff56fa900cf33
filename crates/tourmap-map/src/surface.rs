//! The seam between the controller and whatever renders the map.

use tourmap_core::{Coordinate, LatLngBounds};

/// Handle for a marker placed on a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    Unselected,
    Selected,
}

/// A rendered interactive map.
///
/// All calls are synchronous; only script loading and place lookups suspend.
pub trait MapSurface: Send + Sync {
    fn add_marker(&self, position: Coordinate, icon: MarkerIcon) -> MarkerId;

    /// Removing an unknown id is a no-op.
    fn remove_marker(&self, id: MarkerId);

    fn set_marker_icon(&self, id: MarkerId, icon: MarkerIcon);

    /// Fits the viewport to `bounds` and returns the zoom reported by the
    /// resulting bounds change.
    fn fit_bounds(&self, bounds: &LatLngBounds) -> f64;

    fn set_center(&self, center: Coordinate);

    fn set_zoom(&self, zoom: f64);

    fn zoom(&self) -> f64;
}
