pub mod app_config;
pub mod config;
pub mod geo;
pub mod markers;
pub mod places;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{fit_zoom, mercator_center, visible_bounds, LatLngBounds, Viewport, MAX_MAP_ZOOM};
pub use markers::{load_markers, Coordinate, MarkerDescriptor};
pub use places::{OpeningHours, PhotoRef, PlaceDetails, PlaceStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read markers file {path}: {source}")]
    MarkersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse markers file: {0}")]
    MarkersFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
