use thiserror::Error;

/// Why the map SDK script did not load.
///
/// `Clone` because every caller waiting on one in-flight load receives the
/// same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptLoadError {
    #[error("network error loading {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("unexpected HTTP status {status} loading {url}")]
    Status { status: u16, url: String },

    #[error("map script at {url} was empty")]
    EmptyScript { url: String },

    #[error("invalid map script URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map script failed to load: {0}")]
    ScriptLoad(#[from] ScriptLoadError),

    #[error("no marker at index {index} (map has {len} markers)")]
    UnknownMarker { index: usize, len: usize },

    #[error("map controller has been torn down")]
    TornDown,
}
