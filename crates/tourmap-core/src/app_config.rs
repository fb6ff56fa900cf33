use crate::geo::Viewport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub maps_api_key: String,
    pub maps_base_url: String,
    /// SDK modules requested when the map script is loaded (e.g. `places`).
    pub map_libraries: Vec<String>,
    pub listing_api_url: String,
    pub request_timeout_secs: u64,
    /// Zoom ceiling applied once after fitting a multi-marker viewport.
    pub max_fit_zoom: f64,
    /// Zoom used directly when exactly one marker is on the map.
    pub single_marker_zoom: f64,
    pub viewport: Viewport,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("maps_api_key", &"[redacted]")
            .field("maps_base_url", &self.maps_base_url)
            .field("map_libraries", &self.map_libraries)
            .field("listing_api_url", &self.listing_api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_fit_zoom", &self.max_fit_zoom)
            .field("single_marker_zoom", &self.single_marker_zoom)
            .field("viewport", &self.viewport)
            .finish()
    }
}
