//! Sources of prefill values for steps flagged `prefetch`.
//!
//! Requests run on the blocking pool and report back over a channel; the
//! caller decides with a [`PrefetchTracker`](crate::wizard::PrefetchTracker)
//! whether the result still applies.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::wizard::{FieldValue, FormValues, RequestTicket, StepId};

#[derive(Error, Debug)]
pub enum PrefetchError {
    #[error("No prefill data for step '{0}'")]
    NotFound(StepId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Prefetch task failed: {0}")]
    Task(String),
}

pub trait Prefetcher: Send + Sync {
    fn fetch(&self, step: &StepId) -> Result<FormValues, PrefetchError>;
}

#[derive(Debug)]
pub struct PrefetchOutcome {
    pub ticket: RequestTicket,
    pub result: Result<FormValues, PrefetchError>,
}

/// Run `prefetcher` for `ticket` in the background and send the outcome on `tx`
pub fn spawn_prefetch(
    prefetcher: Arc<dyn Prefetcher>,
    ticket: RequestTicket,
    tx: mpsc::UnboundedSender<PrefetchOutcome>,
) {
    tokio::spawn(async move {
        let step = ticket.step.clone();
        let result = tokio::task::spawn_blocking(move || prefetcher.fetch(&step))
            .await
            .unwrap_or_else(|e| Err(PrefetchError::Task(e.to_string())));
        debug!(step = ticket.step.as_str(), ok = result.is_ok(), "Prefetch finished");
        let _ = tx.send(PrefetchOutcome { ticket, result });
    });
}

/// Canned customer data with artificial latency, for dry runs
#[derive(Debug, Clone)]
pub struct DemoPrefetcher {
    latency: Duration,
}

impl DemoPrefetcher {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for DemoPrefetcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(600))
    }
}

impl Prefetcher for DemoPrefetcher {
    fn fetch(&self, step: &StepId) -> Result<FormValues, PrefetchError> {
        std::thread::sleep(self.latency);
        match step.as_str() {
            "ride-details" => Ok(FormValues::from([
                ("customer_id".to_string(), FieldValue::Text("C-1042".to_string())),
                ("customer_name".to_string(), FieldValue::Text("Dana Reyes".to_string())),
                ("pickup".to_string(), FieldValue::Text("Airport T2".to_string())),
            ])),
            _ => Err(PrefetchError::NotFound(step.clone())),
        }
    }
}

/// Prefill values read from a TOML file keyed by step id:
///
/// ```toml
/// [ride-details]
/// customer_id = "C-1042"
/// extras = ["child seat"]
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixturePrefetcher {
    fixtures: BTreeMap<String, FormValues>,
}

impl FixturePrefetcher {
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, PrefetchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let fixtures: BTreeMap<String, FormValues> = toml::from_str(&content)?;
        info!("Loaded prefill fixtures for {} steps from {:?}", fixtures.len(), path);
        Ok(Self { fixtures })
    }
}

impl Prefetcher for FixturePrefetcher {
    fn fetch(&self, step: &StepId) -> Result<FormValues, PrefetchError> {
        self.fixtures
            .get(step.as_str())
            .cloned()
            .ok_or_else(|| PrefetchError::NotFound(step.clone()))
    }
}
