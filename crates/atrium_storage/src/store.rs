#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use atrium_contracts::draft::{DraftKey, FormDraft};
use atrium_contracts::{ContractViolation, MonotonicTimeNs};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// The backing store refused the operation (private-browsing mode,
    /// detached storage, teardown).
    BackendUnavailable { op: &'static str },
    /// The backing store is out of room for this key.
    QuotaExceeded { key: String },
    /// The value under the key could not be serialized or parsed.
    Malformed { key: String },
    ContractViolation(ContractViolation),
}

impl From<ContractViolation> for StorageError {
    fn from(v: ContractViolation) -> Self {
        StorageError::ContractViolation(v)
    }
}

/// Durable key/value boundary (the browser-local-storage shape). Every
/// operation is fallible; implementations must return errors rather than
/// panic when the backend is unavailable.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: BTreeMap<String, String>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

fn fingerprint_hex(serialized: &str) -> String {
    let digest = Sha256::digest(serialized.as_bytes());
    let mut out = String::with_capacity(64);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Outcome of a draft read that keeps absence apart from breakage.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftLoad {
    Missing,
    Loaded(FormDraft),
    /// Something is under the key but it cannot be read back: backend
    /// failure or unparseable content.
    Unusable,
}

/// Draft persistence, injected wherever the wizard needs it. Mutation surface
/// is save/load/clear only; there is no ambient global access to the draft.
pub struct DraftStore {
    kv: Box<dyn KeyValueStore>,
    key: DraftKey,
    last_saved_fingerprint: Option<String>,
}

impl DraftStore {
    pub fn new(kv: Box<dyn KeyValueStore>, key: DraftKey) -> Self {
        Self {
            kv,
            key,
            last_saved_fingerprint: None,
        }
    }

    pub fn key(&self) -> &DraftKey {
        &self.key
    }

    /// Full overwrite of any prior snapshot under the key. On failure the
    /// prior persisted state and the last-saved fingerprint are untouched,
    /// so callers never mistake a failed save for a completed one.
    pub fn save(&mut self, draft: &FormDraft) -> Result<(), StorageError> {
        let serialized =
            serde_json::to_string(draft).map_err(|_| StorageError::Malformed {
                key: self.key.as_str().to_string(),
            })?;
        self.kv.set_item(self.key.as_str(), &serialized)?;
        self.last_saved_fingerprint = Some(fingerprint_hex(&serialized));
        Ok(())
    }

    /// Missing key, unreadable backend, and malformed content all come back
    /// as `None`; a draft read never fails the caller. Callers that need to
    /// tell an absent snapshot from a broken one use `try_load`.
    pub fn load(&mut self) -> Option<FormDraft> {
        match self.try_load() {
            DraftLoad::Loaded(draft) => Some(draft),
            DraftLoad::Missing | DraftLoad::Unusable => None,
        }
    }

    /// Like `load`, but keeps "nothing stored" apart from "stored but
    /// unreadable" so the flow layer can surface the latter on its audit
    /// trail. Still never an error to the caller.
    pub fn try_load(&mut self) -> DraftLoad {
        let raw = match self.kv.get_item(self.key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return DraftLoad::Missing,
            Err(_) => return DraftLoad::Unusable,
        };
        match serde_json::from_str::<FormDraft>(&raw) {
            Ok(draft) => {
                self.last_saved_fingerprint = Some(fingerprint_hex(&raw));
                DraftLoad::Loaded(draft)
            }
            Err(_) => DraftLoad::Unusable,
        }
    }

    /// Idempotent: clearing an absent draft is a no-op, not an error.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.kv.remove_item(self.key.as_str())?;
        self.last_saved_fingerprint = None;
        Ok(())
    }

    /// Field-level change detection against the last persisted snapshot via
    /// content fingerprint. With nothing persisted (or an unserializable
    /// draft) this conservatively reports `true` so callers never skip a
    /// needed save.
    pub fn has_changed(&self, current: &FormDraft) -> bool {
        let Some(last) = &self.last_saved_fingerprint else {
            return true;
        };
        match serde_json::to_string(current) {
            Ok(serialized) => fingerprint_hex(&serialized) != *last,
            Err(_) => true,
        }
    }
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore")
            .field("key", &self.key)
            .field("last_saved_fingerprint", &self.last_saved_fingerprint)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub window_ms: u32,
}

impl DebounceConfig {
    pub fn mvp_v1() -> Self {
        Self { window_ms: 750 }
    }
}

/// Coalesces rapid edits into a single write: each edit supersedes the
/// pending draft and re-arms the deadline, so only the last edit within the
/// window reaches the store. Single-threaded, tick-driven; no overlapping
/// writes are ever issued for the key.
#[derive(Debug)]
pub struct DebouncedDraftWriter {
    config: DebounceConfig,
    pending: Option<FormDraft>,
    deadline: Option<MonotonicTimeNs>,
}

impl DebouncedDraftWriter {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            pending: None,
            deadline: None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops any pending write, e.g. after a successful final submission.
    pub fn reset(&mut self) {
        self.pending = None;
        self.deadline = None;
    }

    pub fn note_edit(&mut self, now: MonotonicTimeNs, draft: FormDraft) {
        self.pending = Some(draft);
        self.deadline = Some(now.saturating_add_ms(self.config.window_ms));
    }

    /// Flushes the pending draft once its deadline has passed. Unchanged
    /// drafts are skipped without touching the store.
    pub fn tick(
        &mut self,
        now: MonotonicTimeNs,
        store: &mut DraftStore,
    ) -> Option<Result<(), StorageError>> {
        let deadline = self.deadline?;
        if now.0 < deadline.0 {
            return None;
        }
        self.deadline = None;
        let draft = self.pending.take()?;
        if !store.has_changed(&draft) {
            return None;
        }
        Some(store.save(&draft))
    }
}
