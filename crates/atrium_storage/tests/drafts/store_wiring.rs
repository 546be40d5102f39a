#![forbid(unsafe_code)]

use atrium_contracts::draft::{DraftKey, FormDraft};
use atrium_contracts::pricing::{AddonId, BillingCycle, PricingScope, SelectedAddon};
use atrium_storage::repo::DraftRepo;
use atrium_storage::store::{DraftLoad, DraftStore, InMemoryKvStore, KeyValueStore, StorageError};
use rust_decimal::Decimal;

fn store() -> DraftStore {
    DraftStore::new(
        Box::new(InMemoryKvStore::new()),
        DraftKey::new("tenant_wizard_draft").unwrap(),
    )
}

fn populated_draft() -> FormDraft {
    let mut draft = FormDraft::empty();
    draft.organization_name = "Acme Holdings".to_string();
    draft.contact_email = "ops@acme.example".to_string();
    draft.email_verified = true;
    draft.billing_cycle = BillingCycle::Yearly;
    draft.addons = vec![SelectedAddon::v1(
        AddonId::new("reporting").unwrap(),
        PricingScope::Organization,
        Decimal::from(20),
        vec![],
    )
    .unwrap()];
    draft
}

/// Store whose backend refuses every operation, the private-browsing shape.
struct UnavailableKvStore;

impl KeyValueStore for UnavailableKvStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::BackendUnavailable { op: "get_item" })
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded {
            key: "tenant_wizard_draft".to_string(),
        })
    }

    fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::BackendUnavailable { op: "remove_item" })
    }
}

#[test]
fn at_draft_db_01_round_trip_reconstructs_the_snapshot() {
    let mut s = store();
    let draft = populated_draft();
    s.save(&draft).unwrap();
    assert_eq!(s.load(), Some(draft));
}

#[test]
fn at_draft_db_02_save_supersedes_prior_snapshot_whole() {
    let mut s = store();
    s.save(&populated_draft()).unwrap();

    let mut second = FormDraft::empty();
    second.organization_name = "Acme West".to_string();
    s.save(&second).unwrap();

    let loaded = s.load().unwrap();
    assert_eq!(loaded.organization_name, "Acme West");
    // Superseded, not merged: nothing from the first snapshot survives.
    assert!(loaded.addons.is_empty());
    assert!(!loaded.email_verified);
}

#[test]
fn at_draft_db_03_clear_then_load_returns_none_and_is_idempotent() {
    let mut s = store();
    s.save(&populated_draft()).unwrap();
    s.clear().unwrap();
    assert_eq!(s.load(), None);
    // Clearing an absent draft is a no-op, not an error.
    assert!(s.clear().is_ok());
}

#[test]
fn at_draft_db_04_malformed_content_loads_as_none() {
    let mut kv = InMemoryKvStore::new();
    kv.set_item("tenant_wizard_draft", "{not json").unwrap();
    let mut s = DraftStore::new(Box::new(kv), DraftKey::new("tenant_wizard_draft").unwrap());
    assert_eq!(s.load(), None);
}

#[test]
fn at_draft_db_05_unavailable_backend_degrades_without_panic() {
    let mut s = DraftStore::new(
        Box::new(UnavailableKvStore),
        DraftKey::new("tenant_wizard_draft").unwrap(),
    );
    let draft = populated_draft();

    assert!(matches!(
        s.save(&draft),
        Err(StorageError::QuotaExceeded { .. })
    ));
    // The failed save left no last-saved mirror behind: the store still
    // reports the draft as unsaved.
    assert!(s.has_changed(&draft));
    assert_eq!(s.load(), None);
}

#[test]
fn at_draft_db_06_has_changed_tracks_fingerprint_of_last_save() {
    let mut s = store();
    let draft = populated_draft();

    // Nothing persisted yet: conservatively changed.
    assert!(s.has_changed(&draft));

    s.save(&draft).unwrap();
    assert!(!s.has_changed(&draft));

    let mut edited = draft.clone();
    edited.contact_phone = "+15550001111".to_string();
    assert!(s.has_changed(&edited));
}

#[test]
fn at_draft_db_07_try_load_keeps_absence_apart_from_breakage() {
    let mut s = store();
    assert_eq!(s.try_load(), DraftLoad::Missing);

    let draft = populated_draft();
    s.save(&draft).unwrap();
    assert_eq!(s.try_load(), DraftLoad::Loaded(draft));

    let mut kv = InMemoryKvStore::new();
    kv.set_item("tenant_wizard_draft", "{not json").unwrap();
    let mut s = DraftStore::new(Box::new(kv), DraftKey::new("tenant_wizard_draft").unwrap());
    assert_eq!(s.try_load(), DraftLoad::Unusable);

    let mut s = DraftStore::new(
        Box::new(UnavailableKvStore),
        DraftKey::new("tenant_wizard_draft").unwrap(),
    );
    assert_eq!(s.try_load(), DraftLoad::Unusable);
}

#[test]
fn at_draft_db_08_repo_trait_surface_matches_the_store() {
    let mut s = store();
    let draft = populated_draft();
    let repo: &mut dyn DraftRepo = &mut s;

    assert!(repo.draft_has_changed(&draft));
    repo.save_draft(&draft).unwrap();
    assert_eq!(repo.load_draft(), Some(draft));
    repo.clear_draft().unwrap();
    assert_eq!(repo.load_draft(), None);
}
