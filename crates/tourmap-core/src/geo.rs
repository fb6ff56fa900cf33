//! Bounding boxes and Web Mercator viewport fitting.
//!
//! Bounds do not wrap across the antimeridian; marker sets in this system sit
//! within one region, so `west <= east` always holds for bounds built here.

use std::f64::consts::{LN_2, PI};

use crate::markers::Coordinate;

/// Highest zoom level the map surface accepts.
pub const MAX_MAP_ZOOM: f64 = 21.0;

/// Side length in pixels of the whole world at zoom 0.
const WORLD_PX: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    /// Degenerate bounds around a single point.
    #[must_use]
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            south: point.lat,
            west: point.lng,
            north: point.lat,
            east: point.lng,
        }
    }

    /// Smallest bounds containing every coordinate, or `None` for an empty set.
    pub fn from_coordinates<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coordinates.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::from_point(first);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }

    #[must_use]
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }
}

/// Mercator-projected latitude, halved and clamped to the projection's range.
fn mercator_lat(lat: f64) -> f64 {
    let sin = lat.to_radians().sin();
    let rad_x2 = ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    rad_x2.clamp(-PI, PI) / 2.0
}

fn zoom_for(map_px: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return MAX_MAP_ZOOM;
    }
    (map_px / WORLD_PX / fraction).ln().div_euclid(LN_2)
}

/// Largest integer zoom at which `bounds` fits entirely inside `viewport`.
///
/// Degenerate bounds (a single point) fit at every zoom, so they resolve to
/// [`MAX_MAP_ZOOM`].
#[must_use]
pub fn fit_zoom(bounds: &LatLngBounds, viewport: Viewport) -> f64 {
    let lat_fraction = (mercator_lat(bounds.north) - mercator_lat(bounds.south)) / PI;
    let lng_fraction = bounds.lng_span() / 360.0;

    let lat_zoom = zoom_for(f64::from(viewport.height_px), lat_fraction);
    let lng_zoom = zoom_for(f64::from(viewport.width_px), lng_fraction);

    lat_zoom.min(lng_zoom).clamp(0.0, MAX_MAP_ZOOM)
}

/// Center of `bounds` in projected space, which is where a map surface
/// centers a fitted viewport.
#[must_use]
pub fn mercator_center(bounds: &LatLngBounds) -> Coordinate {
    let y = (projected_y(bounds.north) + projected_y(bounds.south)) / 2.0;
    Coordinate {
        lat: y.sinh().atan().to_degrees(),
        lng: (bounds.west + bounds.east) / 2.0,
    }
}

/// The region visible in `viewport` when centered on `center` at `zoom`.
#[must_use]
pub fn visible_bounds(center: Coordinate, zoom: f64, viewport: Viewport) -> LatLngBounds {
    let world_px = WORLD_PX * zoom.exp2();
    let half_lng = f64::from(viewport.width_px) / 2.0 / world_px * 360.0;
    let half_y = f64::from(viewport.height_px) / 2.0 / world_px * 2.0 * PI;
    let y = projected_y(center.lat);
    LatLngBounds {
        south: (y - half_y).sinh().atan().to_degrees(),
        west: center.lng - half_lng,
        north: (y + half_y).sinh().atan().to_degrees(),
        east: center.lng + half_lng,
    }
}

fn projected_y(lat: f64) -> f64 {
    2.0 * mercator_lat(lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat, lng }
    }

    const VIEWPORT: Viewport = Viewport {
        width_px: 800,
        height_px: 600,
    };

    #[test]
    fn from_coordinates_empty_is_none() {
        assert!(LatLngBounds::from_coordinates(Vec::new()).is_none());
    }

    #[test]
    fn bounds_contain_every_input_point() {
        let points = vec![
            coord(-8.409_5, 115.188_9),
            coord(-8.650_0, 115.216_7),
            coord(-8.340_5, 115.092_0),
            coord(-8.506_9, 115.262_5),
        ];
        let bounds = LatLngBounds::from_coordinates(points.clone()).unwrap();
        for p in points {
            assert!(bounds.contains(p), "{p:?} outside {bounds:?}");
        }
        assert!(!bounds.contains(coord(0.0, 0.0)));
    }

    #[test]
    fn single_point_fits_at_max_zoom() {
        let bounds = LatLngBounds::from_point(coord(-8.4, 115.1));
        assert!((fit_zoom(&bounds, VIEWPORT) - MAX_MAP_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn wider_bounds_fit_at_lower_zoom() {
        let narrow =
            LatLngBounds::from_coordinates(vec![coord(-8.40, 115.10), coord(-8.41, 115.11)])
                .unwrap();
        let wide =
            LatLngBounds::from_coordinates(vec![coord(-8.0, 114.5), coord(-9.0, 116.0)]).unwrap();
        let narrow_zoom = fit_zoom(&narrow, VIEWPORT);
        let wide_zoom = fit_zoom(&wide, VIEWPORT);
        assert!(wide_zoom < narrow_zoom, "{wide_zoom} !< {narrow_zoom}");
        assert!(wide_zoom >= 0.0);
    }

    #[test]
    fn fitted_view_contains_every_point() {
        let points = vec![
            coord(-8.409_5, 115.188_9),
            coord(-8.650_0, 115.216_7),
            coord(-8.340_5, 115.092_0),
            coord(-8.506_9, 115.262_5),
        ];
        let bounds = LatLngBounds::from_coordinates(points.clone()).unwrap();
        let zoom = fit_zoom(&bounds, VIEWPORT);
        let view = visible_bounds(mercator_center(&bounds), zoom, VIEWPORT);
        for p in points {
            assert!(view.contains(p), "{p:?} outside {view:?} at zoom {zoom}");
        }
    }

    #[test]
    fn one_zoom_level_further_in_would_not_fit() {
        let bounds =
            LatLngBounds::from_coordinates(vec![coord(-8.0, 114.5), coord(-9.0, 116.0)]).unwrap();
        let zoom = fit_zoom(&bounds, VIEWPORT);
        let tighter = visible_bounds(mercator_center(&bounds), zoom + 1.0, VIEWPORT);
        let lat_span = |b: &LatLngBounds| b.north - b.south;
        assert!(
            lat_span(&tighter) < lat_span(&bounds) || tighter.lng_span() < bounds.lng_span()
        );
    }

    #[test]
    fn whole_world_fits_at_low_zoom() {
        let world =
            LatLngBounds::from_coordinates(vec![coord(-80.0, -180.0), coord(80.0, 180.0)])
                .unwrap();
        assert!(fit_zoom(&world, VIEWPORT) <= 2.0);
    }
}
