use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{Draft, DraftId, DraftStore, SaveError};

/// In-process store for dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    drafts: Mutex<BTreeMap<DraftId, (u64, Draft)>>,
    writes: Mutex<usize>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saves that actually stored something
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.drafts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &DraftId) -> Option<Draft> {
        self.drafts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .map(|(_, d)| d.clone())
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&self, draft: &Draft) -> Result<DraftId, SaveError> {
        let id = draft.id();
        let fingerprint = draft.fingerprint()?;
        let mut drafts = self.drafts.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((fp, stored)) = drafts.get(&id) {
            if draft.revision < stored.revision || *fp == fingerprint {
                return Ok(id);
            }
        }

        drafts.insert(id.clone(), (fingerprint, draft.clone()));
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(id)
    }
}
