//! At-most-once loading of the map SDK script.
//!
//! [`ScriptLoader`] moves through `NotLoaded -> Loading -> Ready`. Callers
//! arriving while a load is in flight await the same shared future, so the
//! script is injected once no matter how many maps mount at the same time.
//! A failed load drops back to `NotLoaded`; the next call injects again.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Client, Url};

use crate::error::ScriptLoadError;

/// Global function name the SDK calls once it has initialised.
pub const CALLBACK_NAME: &str = "initMap";

const SCRIPT_PATH: &str = "maps/api/js";

pub type LoadFuture = BoxFuture<'static, Result<(), ScriptLoadError>>;

/// Where the SDK script comes from.
pub trait ScriptSource: Send + Sync {
    /// Whether the SDK is already initialised without our help.
    fn is_present(&self) -> bool;

    /// Starts loading the script at `url`. The future resolves when the SDK
    /// invokes `callback`, or fails when the script reports a load error.
    fn inject(&self, url: &Url, callback: &str) -> LoadFuture;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    NotLoaded,
    Loading,
    Ready,
}

enum LoadState {
    NotLoaded,
    Loading {
        attempt: u64,
        future: Shared<LoadFuture>,
    },
    Ready,
}

pub struct ScriptLoader {
    source: Arc<dyn ScriptSource>,
    script_url: Url,
    state: Mutex<LoadState>,
    attempts: AtomicU64,
}

impl ScriptLoader {
    /// # Errors
    ///
    /// Returns [`ScriptLoadError::InvalidUrl`] if `maps_base_url` does not
    /// parse.
    pub fn new(
        source: Arc<dyn ScriptSource>,
        maps_base_url: &str,
        api_key: &str,
        libraries: &[String],
    ) -> Result<Self, ScriptLoadError> {
        let script_url = build_script_url(maps_base_url, api_key, libraries)?;
        Ok(Self {
            source,
            script_url,
            state: Mutex::new(LoadState::NotLoaded),
            attempts: AtomicU64::new(0),
        })
    }

    #[must_use]
    pub fn script_url(&self) -> &Url {
        &self.script_url
    }

    #[must_use]
    pub fn status(&self) -> LoadStatus {
        match *self.lock() {
            LoadState::NotLoaded => LoadStatus::NotLoaded,
            LoadState::Loading { .. } => LoadStatus::Loading,
            LoadState::Ready => LoadStatus::Ready,
        }
    }

    /// Number of times the script has been injected.
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Resolves once the SDK is usable.
    ///
    /// # Errors
    ///
    /// Returns the [`ScriptLoadError`] of the in-flight load. Every caller
    /// that joined that load receives the same error.
    pub async fn ensure_loaded(&self) -> Result<(), ScriptLoadError> {
        let (attempt, future) = {
            let mut state = self.lock();
            match &*state {
                LoadState::Ready => return Ok(()),
                LoadState::Loading { attempt, future } => (*attempt, future.clone()),
                LoadState::NotLoaded => {
                    if self.source.is_present() {
                        *state = LoadState::Ready;
                        return Ok(());
                    }
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    tracing::debug!(
                        attempt,
                        url = %redact_key(&self.script_url),
                        "injecting map script"
                    );
                    let future = self.source.inject(&self.script_url, CALLBACK_NAME).shared();
                    *state = LoadState::Loading {
                        attempt,
                        future: future.clone(),
                    };
                    (attempt, future)
                }
            }
        };

        let result = future.await;

        let mut state = self.lock();
        if matches!(&*state, LoadState::Loading { attempt: current, .. } if *current == attempt) {
            *state = match &result {
                Ok(()) => LoadState::Ready,
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "map script failed to load");
                    LoadState::NotLoaded
                }
            };
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn build_script_url(
    maps_base_url: &str,
    api_key: &str,
    libraries: &[String],
) -> Result<Url, ScriptLoadError> {
    let normalised = format!("{}/", maps_base_url.trim_end_matches('/'));
    let mut url = Url::parse(&normalised)
        .and_then(|base| base.join(SCRIPT_PATH))
        .map_err(|e| ScriptLoadError::InvalidUrl(format!("'{maps_base_url}': {e}")))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("key", api_key);
        if !libraries.is_empty() {
            pairs.append_pair("libraries", &libraries.join(","));
        }
        pairs.append_pair("callback", CALLBACK_NAME);
    }
    Ok(url)
}

/// Loads the SDK bootstrap script over HTTP.
///
/// A 2xx response with a non-empty body counts as the SDK calling back.
pub struct HttpScriptSource {
    client: Client,
    loaded: Arc<AtomicBool>,
}

impl HttpScriptSource {
    /// # Errors
    ///
    /// Returns [`ScriptLoadError::Network`] if the `reqwest::Client` cannot
    /// be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, ScriptLoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tourmap/0.1 (map-script)")
            .build()
            .map_err(|e| ScriptLoadError::Network {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            loaded: Arc::new(AtomicBool::new(false)),
        })
    }
}

impl ScriptSource for HttpScriptSource {
    fn is_present(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn inject(&self, url: &Url, _callback: &str) -> LoadFuture {
        let client = self.client.clone();
        let loaded = Arc::clone(&self.loaded);
        let url = url.clone();
        async move {
            let network = |e: reqwest::Error| ScriptLoadError::Network {
                url: redact_key(&url),
                reason: e.without_url().to_string(),
            };
            let response = client.get(url.clone()).send().await.map_err(network)?;
            let status = response.status();
            if !status.is_success() {
                return Err(ScriptLoadError::Status {
                    status: status.as_u16(),
                    url: redact_key(&url),
                });
            }
            let body = response.text().await.map_err(network)?;
            if body.trim().is_empty() {
                return Err(ScriptLoadError::EmptyScript {
                    url: redact_key(&url),
                });
            }
            loaded.store(true, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }
}

/// Script URL without the API key, for errors and logs.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "key")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
