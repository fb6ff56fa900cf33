//! Markers currently placed on the map, in descriptor order.

use tourmap_core::MarkerDescriptor;

use crate::surface::{MapSurface, MarkerIcon, MarkerId};

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredMarker {
    /// Position in the descriptor list that produced this marker.
    pub index: usize,
    pub descriptor: MarkerDescriptor,
    pub id: MarkerId,
}

/// One generation of markers. A new descriptor list always replaces the
/// whole registry; markers are never reused across generations.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    version: u64,
    markers: Vec<RegisteredMarker>,
}

impl MarkerRegistry {
    /// `markers` may arrive in any order; they are stored by `index`.
    #[must_use]
    pub fn new(version: u64, mut markers: Vec<RegisteredMarker>) -> Self {
        markers.sort_by_key(|m| m.index);
        Self { version, markers }
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RegisteredMarker> {
        self.markers.iter().find(|m| m.index == index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredMarker> {
        self.markers.iter()
    }

    /// Removes every marker from `surface` and empties the registry.
    pub fn dispose(&mut self, surface: &dyn MapSurface) {
        for marker in self.markers.drain(..) {
            surface.remove_marker(marker.id);
        }
    }

    pub fn restyle_all(&self, surface: &dyn MapSurface, icon: MarkerIcon) {
        for marker in &self.markers {
            surface.set_marker_icon(marker.id, icon);
        }
    }
}

#[cfg(test)]
mod tests {
    use tourmap_core::Viewport;

    use super::*;
    use crate::headless::HeadlessMap;

    fn surface() -> HeadlessMap {
        HeadlessMap::new(Viewport {
            width_px: 800,
            height_px: 600,
        })
    }

    fn place(surface: &HeadlessMap, index: usize, place_id: &str) -> RegisteredMarker {
        let descriptor = MarkerDescriptor::new(place_id, -8.0 - index as f64, 115.0);
        let id = surface.add_marker(descriptor.coordinate, MarkerIcon::Unselected);
        RegisteredMarker {
            index,
            descriptor,
            id,
        }
    }

    #[test]
    fn markers_are_ordered_by_descriptor_index() {
        let map = surface();
        let c = place(&map, 2, "C");
        let a = place(&map, 0, "A");
        let b = place(&map, 1, "B");
        let registry = MarkerRegistry::new(3, vec![c, a, b]);

        let ids: Vec<_> = registry.iter().map(|m| m.descriptor.place_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(registry.get(1).map(|m| m.descriptor.place_id.as_str()), Some("B"));
        assert!(registry.get(3).is_none());
        assert_eq!(registry.version(), 3);
    }

    #[test]
    fn registry_keeps_gaps_from_skipped_markers() {
        let map = surface();
        let registry = MarkerRegistry::new(1, vec![place(&map, 0, "A"), place(&map, 2, "C")]);

        assert_eq!(registry.len(), 2);
        assert!(registry.get(1).is_none());
        assert_eq!(registry.get(2).map(|m| m.descriptor.place_id.as_str()), Some("C"));
    }

    #[test]
    fn dispose_removes_every_marker_from_the_surface() {
        let map = surface();
        let mut registry = MarkerRegistry::new(1, vec![place(&map, 0, "A"), place(&map, 1, "B")]);
        assert_eq!(map.markers().len(), 2);

        registry.dispose(&map);
        assert!(registry.is_empty());
        assert!(map.markers().is_empty());
    }

    #[test]
    fn restyle_all_sets_every_icon() {
        let map = surface();
        let registry = MarkerRegistry::new(1, vec![place(&map, 0, "A"), place(&map, 1, "B")]);
        map.set_marker_icon(registry.get(0).unwrap().id, MarkerIcon::Selected);

        registry.restyle_all(&map, MarkerIcon::Unselected);
        assert!(map
            .markers()
            .iter()
            .all(|(_, m)| m.icon == MarkerIcon::Unselected));
    }
}
