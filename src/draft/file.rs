use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use super::{Draft, DraftId, DraftStore, SaveError};

/// Writes one TOML file per draft id into a directory
#[derive(Debug)]
pub struct FileDraftStore {
    dir: PathBuf,
    /// Revision and fingerprint of the last write per draft
    last_saved: Mutex<HashMap<DraftId, (u64, u64)>>,
}

impl FileDraftStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            last_saved: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &DraftId) -> PathBuf {
        self.dir.join(format!("{id}.toml"))
    }
}

impl DraftStore for FileDraftStore {
    fn save(&self, draft: &Draft) -> Result<DraftId, SaveError> {
        let id = draft.id();
        let path = self.path_for(&id);
        let fingerprint = draft.fingerprint()?;

        let mut last_saved = self.last_saved.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(&(revision, last_fingerprint)) = last_saved.get(&id) {
            if draft.revision < revision {
                debug!("Draft {id} revision {} is older than {revision}, skipping write", draft.revision);
                return Ok(id);
            }
            if last_fingerprint == fingerprint && path.exists() {
                debug!("Draft {id} unchanged, skipping write");
                return Ok(id);
            }
        }

        std::fs::create_dir_all(&self.dir)?;
        let content = toml::to_string_pretty(draft)?;

        // Write then rename so a crash never leaves a half-written draft
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;

        last_saved.insert(id.clone(), (draft.revision, fingerprint));
        debug!("Draft {id} written to {:?}", path);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::tests::{newer_draft, sample_draft};

    #[test]
    fn writes_readable_toml() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join("drafts"));
        let draft = sample_draft();

        let id = store.save(&draft).unwrap();
        let text = std::fs::read_to_string(store.path_for(&id)).unwrap();
        let back: Draft = toml::from_str(&text).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn repeated_save_does_not_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        let draft = sample_draft();

        let id = store.save(&draft).unwrap();
        let path = store.path_for(&id);
        std::fs::write(&path, "sentinel").unwrap();

        let mut later = draft.clone();
        later.saved_at = "later".to_string();
        assert_eq!(store.save(&later).unwrap(), id);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "sentinel");

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn deleted_file_is_written_again() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        let draft = sample_draft();

        let id = store.save(&draft).unwrap();
        std::fs::remove_file(store.path_for(&id)).unwrap();
        store.save(&draft).unwrap();
        assert!(store.path_for(&id).exists());
    }

    #[test]
    fn older_snapshot_does_not_replace_newer() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        let older = sample_draft();
        let newer = newer_draft();

        store.save(&newer).unwrap();
        let id = store.save(&older).unwrap();

        let text = std::fs::read_to_string(store.path_for(&id)).unwrap();
        let back: Draft = toml::from_str(&text).unwrap();
        assert_eq!(back, newer);
    }
}
