#![forbid(unsafe_code)]

use atrium_contracts::audit::{AuditEvent, AuditEventId, AuditEventInput};
use atrium_contracts::{CorrelationId, Validate};

use crate::store::StorageError;

/// Append-only operational trail for the wizard core. Row ids are assigned
/// monotonically and never reused; rows are never mutated after append.
#[derive(Debug, Default)]
pub struct AuditLedger {
    rows: Vec<AuditEvent>,
    next_id: u64,
}

impl AuditLedger {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    pub fn append(&mut self, input: AuditEventInput) -> Result<AuditEventId, StorageError> {
        input.validate()?;
        let id = AuditEventId(self.next_id);
        self.next_id += 1;
        self.rows.push(AuditEvent {
            audit_event_id: id,
            at: input.at,
            correlation_id: input.correlation_id,
            engine: input.engine,
            event_type: input.event_type,
            severity: input.severity,
            reason_code: input.reason_code,
            payload: input.payload,
        });
        Ok(id)
    }

    pub fn rows(&self) -> &[AuditEvent] {
        &self.rows
    }

    pub fn rows_by_correlation(&self, correlation_id: CorrelationId) -> Vec<&AuditEvent> {
        self.rows
            .iter()
            .filter(|row| row.correlation_id == correlation_id)
            .collect()
    }
}
