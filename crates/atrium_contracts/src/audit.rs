#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::{ContractViolation, CorrelationId, MonotonicTimeNs, ReasonCodeId, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AuditEventId(pub u64);

impl Validate for AuditEventId {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "audit_event_id",
                reason: "must be > 0",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuditEngine {
    Navigator,
    Verify,
    Pricing,
    Draft,
    Confirm,
    Flow,
    Other(String),
}

impl Validate for AuditEngine {
    fn validate(&self) -> Result<(), ContractViolation> {
        if let AuditEngine::Other(s) = self {
            if s.trim().is_empty() {
                return Err(ContractViolation::InvalidValue {
                    field: "audit_engine.other",
                    reason: "must not be empty",
                });
            }
            if s.len() > 64 {
                return Err(ContractViolation::InvalidValue {
                    field: "audit_engine.other",
                    reason: "must be <= 64 chars",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditEventType {
    StateTransition,
    GatePass,
    GateFail,
    TabsLocked,
    DraftSaved,
    DraftLoaded,
    DraftLoadFailed,
    DraftSaveFailed,
    DraftCleared,
    OtpSent,
    OtpVerified,
    OtpRejected,
    ConfirmRequested,
    ConfirmResolved,
    SubmissionAccepted,
    SubmissionRejected,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditSeverity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PayloadKey(String);

fn is_lower_snake_key(s: &str) -> bool {
    let b = s.as_bytes();
    if b.is_empty() || !b[0].is_ascii_lowercase() {
        return false;
    }
    b.iter()
        .all(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'_')
}

impl PayloadKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ContractViolation> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "payload_key",
                reason: "must not be empty",
            });
        }
        if key.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "payload_key",
                reason: "must be <= 64 chars",
            });
        }
        if !is_lower_snake_key(&key) {
            return Err(ContractViolation::InvalidValue {
                field: "payload_key",
                reason: "must be lower_snake_case (a-z0-9_)",
            });
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Text(String),
    Uint(u64),
    Flag(bool),
}

impl Validate for PayloadValue {
    fn validate(&self) -> Result<(), ContractViolation> {
        if let PayloadValue::Text(s) = self {
            if s.len() > 256 {
                return Err(ContractViolation::InvalidValue {
                    field: "payload_value.text",
                    reason: "must be <= 256 chars",
                });
            }
        }
        Ok(())
    }
}

/// Bounded key/value payload attached to one audit row. Small by contract:
/// the ledger is an operational trail, not a dumping ground.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditPayloadMin(BTreeMap<PayloadKey, PayloadValue>);

impl AuditPayloadMin {
    pub const MAX_ENTRIES: usize = 8;

    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(
        mut self,
        key: PayloadKey,
        value: PayloadValue,
    ) -> Result<Self, ContractViolation> {
        value.validate()?;
        self.0.insert(key, value);
        if self.0.len() > Self::MAX_ENTRIES {
            return Err(ContractViolation::InvalidValue {
                field: "audit_payload",
                reason: "too many payload entries",
            });
        }
        Ok(self)
    }

    pub fn entries(&self) -> &BTreeMap<PayloadKey, PayloadValue> {
        &self.0
    }
}

impl Validate for AuditPayloadMin {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0.len() > Self::MAX_ENTRIES {
            return Err(ContractViolation::InvalidValue {
                field: "audit_payload",
                reason: "too many payload entries",
            });
        }
        for value in self.0.values() {
            value.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEventInput {
    pub at: MonotonicTimeNs,
    pub correlation_id: CorrelationId,
    pub engine: AuditEngine,
    pub event_type: AuditEventType,
    pub severity: AuditSeverity,
    pub reason_code: ReasonCodeId,
    pub payload: AuditPayloadMin,
}

impl AuditEventInput {
    #[allow(clippy::too_many_arguments)]
    pub fn v1(
        at: MonotonicTimeNs,
        correlation_id: CorrelationId,
        engine: AuditEngine,
        event_type: AuditEventType,
        severity: AuditSeverity,
        reason_code: ReasonCodeId,
        payload: AuditPayloadMin,
    ) -> Result<Self, ContractViolation> {
        let v = Self {
            at,
            correlation_id,
            engine,
            event_type,
            severity,
            reason_code,
            payload,
        };
        v.validate()?;
        Ok(v)
    }
}

impl Validate for AuditEventInput {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.correlation_id.validate()?;
        self.engine.validate()?;
        self.payload.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub audit_event_id: AuditEventId,
    pub at: MonotonicTimeNs,
    pub correlation_id: CorrelationId,
    pub engine: AuditEngine,
    pub event_type: AuditEventType,
    pub severity: AuditSeverity,
    pub reason_code: ReasonCodeId,
    pub payload: AuditPayloadMin,
}
