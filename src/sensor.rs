//! Sensor instances and platform setup.

use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;
use tracing::error;

use crate::config::Config;
use crate::error::GlancesError;
use crate::fetcher::{GlancesData, REQUEST_TIMEOUT};
use crate::metrics::{metric_spec, value_of, MetricSpec};
use crate::Result;

const API_PATH: &str = "/api/2/all";

/// One configured metric, bound to the fetcher shared by all sensors of the
/// same host. Holds no payload of its own.
pub struct GlancesSensor {
    rest: Arc<GlancesData>,
    spec: &'static MetricSpec,
}

impl GlancesSensor {
    pub fn new(rest: Arc<GlancesData>, spec: &'static MetricSpec) -> Self {
        GlancesSensor { rest, spec }
    }

    pub fn metric_id(&self) -> &'static str {
        self.spec.id
    }

    /// Display name of the sensor.
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Unit the value is expressed in. Empty for bare counts.
    pub fn unit_of_measurement(&self) -> &'static str {
        self.spec.unit
    }

    /// Current value, or `None` while no valid measurement is available
    /// (never fetched, or the last fetch hit a connection failure).
    pub fn state(&self) -> Option<Value> {
        self.rest
            .payload()
            .map(|payload| value_of(&payload, self.spec))
    }

    /// Asks the shared fetcher for fresh data. Throttled, so only the first
    /// sensor of an update cycle actually goes out on the network.
    pub async fn update(&self) -> Result<()> {
        self.rest.update().await
    }
}

/// Sets up the Glances sensor platform: validates the config, probes the
/// endpoint once, and instantiates one sensor per known configured resource.
///
/// Unknown resource identifiers are logged and skipped; they do not fail the
/// rest of the set. A missing `host` or `resources` key, or a failed probe,
/// aborts setup with nothing registered.
pub async fn setup(config: &Config) -> Result<Vec<GlancesSensor>> {
    let host = config
        .host
        .as_deref()
        .ok_or(GlancesError::MissingConfig("host"))?;
    let resources = config
        .resources
        .as_ref()
        .ok_or(GlancesError::MissingConfig("resources"))?;

    let url = format!("http://{}:{}{}", host, config.port, API_PATH);
    probe(&url).await?;

    let rest = Arc::new(GlancesData::new(url));

    let mut sensors = Vec::new();
    for resource in resources {
        match metric_spec(resource) {
            Some(spec) => sensors.push(GlancesSensor::new(Arc::clone(&rest), spec)),
            None => error!(resource = %resource, "sensor type does not exist, skipping"),
        }
    }

    // Prime the payload so sensors are readable right after setup. The probe
    // above is deliberately outside the fetcher's throttle window.
    if !sensors.is_empty() {
        rest.update().await?;
    }

    Ok(sensors)
}

/// One-off connectivity check against the endpoint, with the same timeout as
/// regular fetches but none of the throttling.
async fn probe(url: &str) -> Result<()> {
    let response = Client::new()
        .get(url)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|source| {
            if source.is_builder() {
                GlancesError::InvalidResource {
                    url: url.to_string(),
                    source,
                }
            } else {
                GlancesError::Unreachable {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(GlancesError::ProbeStatus {
            url: url.to_string(),
            status,
        });
    }
    Ok(())
}
