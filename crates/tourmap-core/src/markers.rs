use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the WGS84 latitude/longitude ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A point of interest to annotate on the map.
///
/// Lists of descriptors are taken as given: duplicates are not collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDescriptor {
    #[serde(alias = "placeId")]
    pub place_id: String,
    pub coordinate: Coordinate,
}

impl MarkerDescriptor {
    pub fn new(place_id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            place_id: place_id.into(),
            coordinate: Coordinate::new(lat, lng),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MarkersFile {
    markers: Vec<MarkerDescriptor>,
}

/// Load marker descriptors from a YAML (or JSON) file of the form
/// `markers: [{ place_id, coordinate: { lat, lng } }]`.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or contains a
/// descriptor with an empty place id or an out-of-range coordinate.
pub fn load_markers(path: &Path) -> Result<Vec<MarkerDescriptor>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MarkersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: MarkersFile = serde_yaml::from_str(&content)?;
    validate_markers(&file.markers)?;

    Ok(file.markers)
}

fn validate_markers(markers: &[MarkerDescriptor]) -> Result<(), ConfigError> {
    for (index, marker) in markers.iter().enumerate() {
        if marker.place_id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "marker {index} has an empty place_id"
            )));
        }
        if !marker.coordinate.is_valid() {
            return Err(ConfigError::Validation(format!(
                "marker {index} ('{}') has an invalid coordinate ({}, {})",
                marker.place_id, marker.coordinate.lat, marker.coordinate.lng
            )));
        }
    }
    Ok(())
}
