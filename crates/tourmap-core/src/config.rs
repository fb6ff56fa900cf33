use crate::app_config::{AppConfig, Environment};
use crate::geo::{Viewport, MAX_MAP_ZOOM};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_zoom = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let zoom = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if !(0.0..=MAX_MAP_ZOOM).contains(&zoom) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("zoom must be between 0 and {MAX_MAP_ZOOM}, got {zoom}"),
            });
        }
        Ok(zoom)
    };

    let maps_api_key = require("TOURMAP_MAPS_API_KEY")?;

    let env = parse_environment(&or_default("TOURMAP_ENV", "development"))?;
    let log_level = or_default("TOURMAP_LOG_LEVEL", "info");

    let maps_base_url = or_default("TOURMAP_MAPS_BASE_URL", "https://maps.googleapis.com");
    let map_libraries = parse_libraries(&or_default("TOURMAP_MAP_LIBRARIES", "places"));
    let listing_api_url = or_default("TOURMAP_LISTING_API_URL", "http://localhost:8000/api");
    let request_timeout_secs = parse_u64("TOURMAP_REQUEST_TIMEOUT_SECS", "30")?;

    let max_fit_zoom = parse_zoom("TOURMAP_MAX_FIT_ZOOM", "15")?;
    let single_marker_zoom = parse_zoom("TOURMAP_SINGLE_MARKER_ZOOM", "17")?;

    let width_px = parse_u32("TOURMAP_VIEWPORT_WIDTH", "800")?;
    let height_px = parse_u32("TOURMAP_VIEWPORT_HEIGHT", "600")?;
    if width_px == 0 || height_px == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TOURMAP_VIEWPORT_WIDTH/TOURMAP_VIEWPORT_HEIGHT".to_string(),
            reason: "viewport dimensions must be non-zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        maps_api_key,
        maps_base_url,
        map_libraries,
        listing_api_url,
        request_timeout_secs,
        max_fit_zoom,
        single_marker_zoom,
        viewport: Viewport {
            width_px,
            height_px,
        },
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TOURMAP_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

/// Split a comma-separated module list, dropping blanks.
fn parse_libraries(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
