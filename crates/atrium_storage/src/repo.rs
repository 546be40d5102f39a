#![forbid(unsafe_code)]

use atrium_contracts::audit::{AuditEvent, AuditEventId, AuditEventInput};
use atrium_contracts::draft::FormDraft;
use atrium_contracts::CorrelationId;

use crate::audit::AuditLedger;
use crate::store::{DraftStore, StorageError};

/// Typed repository interface for draft persistence.
pub trait DraftRepo {
    fn save_draft(&mut self, draft: &FormDraft) -> Result<(), StorageError>;
    fn load_draft(&mut self) -> Option<FormDraft>;
    fn clear_draft(&mut self) -> Result<(), StorageError>;
    fn draft_has_changed(&self, current: &FormDraft) -> bool;
}

impl DraftRepo for DraftStore {
    fn save_draft(&mut self, draft: &FormDraft) -> Result<(), StorageError> {
        self.save(draft)
    }

    fn load_draft(&mut self) -> Option<FormDraft> {
        self.load()
    }

    fn clear_draft(&mut self) -> Result<(), StorageError> {
        self.clear()
    }

    fn draft_has_changed(&self, current: &FormDraft) -> bool {
        self.has_changed(current)
    }
}

/// Typed repository interface for append-only audit persistence.
pub trait AuditRepo {
    fn append_audit_row(&mut self, input: AuditEventInput) -> Result<AuditEventId, StorageError>;
    fn audit_rows(&self) -> &[AuditEvent];
    fn audit_rows_by_correlation(&self, correlation_id: CorrelationId) -> Vec<&AuditEvent>;
}

impl AuditRepo for AuditLedger {
    fn append_audit_row(&mut self, input: AuditEventInput) -> Result<AuditEventId, StorageError> {
        self.append(input)
    }

    fn audit_rows(&self) -> &[AuditEvent] {
        self.rows()
    }

    fn audit_rows_by_correlation(&self, correlation_id: CorrelationId) -> Vec<&AuditEvent> {
        self.rows_by_correlation(correlation_id)
    }
}
