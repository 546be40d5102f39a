#![forbid(unsafe_code)]

use atrium_contracts::audit::{
    AuditEngine, AuditEventInput, AuditEventType, AuditPayloadMin, AuditSeverity, PayloadKey,
    PayloadValue,
};
use atrium_contracts::{CorrelationId, MonotonicTimeNs, ReasonCodeId};
use atrium_storage::audit::AuditLedger;
use atrium_storage::repo::AuditRepo;

fn input(t: u64, correlation: u128, event_type: AuditEventType) -> AuditEventInput {
    AuditEventInput::v1(
        MonotonicTimeNs(t),
        CorrelationId(correlation),
        AuditEngine::Navigator,
        event_type,
        AuditSeverity::Info,
        ReasonCodeId(0x4E56_0001),
        AuditPayloadMin::empty()
            .with(
                PayloadKey::new("active_tab").unwrap(),
                PayloadValue::Text("plan".to_string()),
            )
            .unwrap(),
    )
    .unwrap()
}

#[test]
fn at_audit_db_01_ids_are_monotonic_and_rows_append_only() {
    let mut ledger = AuditLedger::new();
    let first = ledger.append(input(10, 1, AuditEventType::StateTransition)).unwrap();
    let second = ledger.append(input(11, 1, AuditEventType::TabsLocked)).unwrap();
    assert!(second.0 > first.0);
    assert_eq!(ledger.rows().len(), 2);
    assert_eq!(ledger.rows()[0].audit_event_id, first);
    // Payload survives the append untouched.
    let key = PayloadKey::new("active_tab").unwrap();
    assert_eq!(
        ledger.rows()[0].payload.entries().get(&key),
        Some(&PayloadValue::Text("plan".to_string()))
    );
}

#[test]
fn at_audit_db_02_rows_filter_by_correlation() {
    let mut ledger = AuditLedger::new();
    ledger.append(input(10, 1, AuditEventType::StateTransition)).unwrap();
    ledger.append(input(11, 2, AuditEventType::DraftSaved)).unwrap();
    ledger.append(input(12, 1, AuditEventType::OtpSent)).unwrap();

    let rows = ledger.rows_by_correlation(CorrelationId(1));
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .all(|r| r.correlation_id == CorrelationId(1)));
}

#[test]
fn at_audit_db_03_invalid_input_is_refused_before_append() {
    let mut ledger = AuditLedger::new();
    let bad = AuditEventInput {
        at: MonotonicTimeNs(1),
        correlation_id: CorrelationId(0),
        engine: AuditEngine::Flow,
        event_type: AuditEventType::Other,
        severity: AuditSeverity::Warn,
        reason_code: ReasonCodeId(1),
        payload: AuditPayloadMin::empty(),
    };
    assert!(ledger.append(bad).is_err());
    assert!(ledger.rows().is_empty());
}

#[test]
fn at_audit_db_04_repo_trait_surface_matches_the_ledger() {
    let mut ledger = AuditLedger::new();
    let repo: &mut dyn AuditRepo = &mut ledger;
    repo.append_audit_row(input(10, 7, AuditEventType::SubmissionAccepted))
        .unwrap();
    assert_eq!(repo.audit_rows().len(), 1);
    assert_eq!(repo.audit_rows_by_correlation(CorrelationId(7)).len(), 1);
}
