//! "Save Draft" persistence.
//!
//! Saving is idempotent per session: a draft is addressed by flow and session,
//! and stores skip the write when nothing but the timestamp changed. Saves run
//! in the background and never touch wizard state.
//!
//! Background saves may finish out of order, so every snapshot carries the
//! session's save counter and stores drop anything older than what they last
//! wrote.

mod file;
mod memory;

pub use file::FileDraftStore;
pub use memory::MemoryDraftStore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::wizard::{FormValues, StepId, WizardController};

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Draft save task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DraftId(String);

impl DraftId {
    pub fn new(flow: &str, session: &str) -> Self {
        Self(format!("{flow}-{session}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a wizard session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub flow: String,
    pub session: String,
    /// Per-session save counter; higher is newer
    #[serde(default)]
    pub revision: u64,
    pub saved_at: String,
    pub current_step: StepId,
    pub visited: Vec<StepId>,
    pub steps: BTreeMap<StepId, FormValues>,
}

impl Draft {
    pub fn capture(
        flow: &str,
        session: &str,
        revision: u64,
        controller: &WizardController,
        steps: BTreeMap<StepId, FormValues>,
    ) -> Self {
        Self {
            flow: flow.to_string(),
            session: session.to_string(),
            revision,
            saved_at: chrono::Local::now().to_rfc3339(),
            current_step: controller.current_step().id.clone(),
            visited: controller.visited_ids().into_iter().cloned().collect(),
            steps,
        }
    }

    pub fn id(&self) -> DraftId {
        DraftId::new(&self.flow, &self.session)
    }

    /// Content hash ignoring `saved_at` and `revision`
    pub fn fingerprint(&self) -> Result<u64, SaveError> {
        let mut body = self.clone();
        body.saved_at.clear();
        body.revision = 0;
        let text = toml::to_string(&body)?;
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        Ok(hasher.finish())
    }
}

pub trait DraftStore: Send + Sync {
    fn save(&self, draft: &Draft) -> Result<DraftId, SaveError>;
}

/// Non-modal indicator state shown in the header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DraftStatus {
    #[default]
    Idle,
    Saving,
    Saved(DraftId),
    Failed(String),
}

#[derive(Debug)]
pub struct DraftOutcome {
    pub result: Result<DraftId, SaveError>,
}

/// Fire-and-forget save on the blocking pool; the outcome arrives on `tx`
pub fn spawn_save(store: Arc<dyn DraftStore>, draft: Draft, tx: mpsc::UnboundedSender<DraftOutcome>) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || store.save(&draft))
            .await
            .unwrap_or_else(|e| Err(SaveError::Task(e.to_string())));

        match &result {
            Ok(id) => info!("Draft saved: {id}"),
            Err(e) => warn!("Draft save failed: {e}"),
        }
        let _ = tx.send(DraftOutcome { result });
    });
}
