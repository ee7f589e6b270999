//! Throttled retrieval of the Glances `/api/2/all` payload.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;
use tracing::error;

use crate::Result;

/// Return cached results if the last fetch was less than this time ago.
pub const MIN_TIME_BETWEEN_UPDATES: Duration = Duration::from_secs(60);

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct FetchState {
    /// Last successfully parsed payload, or `None` after a connection
    /// failure. Replaced wholesale, never merged.
    payload: Option<Value>,
    /// When the last actual network request happened. Recorded on failed
    /// fetches too, so failures are not retried faster than successes.
    last_fetch: Option<Instant>,
}

/// Handles data retrieval from a single Glances endpoint. Shared by
/// reference between all sensors bound to the same host.
pub struct GlancesData {
    url: String,
    client: Client,
    throttle: Duration,
    state: Mutex<FetchState>,
}

impl GlancesData {
    pub fn new(url: String) -> Self {
        Self::with_throttle(url, MIN_TIME_BETWEEN_UPDATES)
    }

    /// Same as [`GlancesData::new`] but with a custom throttle window.
    pub fn with_throttle(url: String, throttle: Duration) -> Self {
        GlancesData {
            url,
            client: Client::new(),
            throttle,
            state: Mutex::new(FetchState::default()),
        }
    }

    /// Current payload, as left by the most recently completed update.
    pub fn payload(&self) -> Option<Value> {
        self.state.lock().unwrap().payload.clone()
    }

    /// Fetches the latest data from the Glances REST API, unless a fetch
    /// already happened within the throttle window (then this is a no-op
    /// and the cached payload stays).
    ///
    /// A connection failure is absorbed: it is logged, the payload becomes
    /// `None`, and the sensors read as unknown until the next successful
    /// fetch. Any other transport or decode failure is returned to the
    /// caller with the payload untouched.
    pub async fn update(&self) -> Result<()> {
        {
            let state = self.state.lock().unwrap();
            if let Some(last) = state.last_fetch {
                if last.elapsed() < self.throttle {
                    return Ok(());
                }
            }
        }

        let fetched = self.fetch().await;

        let mut state = self.state.lock().unwrap();
        state.last_fetch = Some(Instant::now());
        match fetched {
            Ok(payload) => {
                state.payload = Some(payload);
                Ok(())
            }
            Err(e) if e.is_connect() => {
                state.payload = None;
                drop(state);
                error!(url = %self.url, error = %e, "No route to host/endpoint. Is the device offline?");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch(&self) -> reqwest::Result<Value> {
        let response = self
            .client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        response.json().await
    }
}
