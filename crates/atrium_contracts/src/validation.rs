#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::{ContractViolation, Validate};

/// Key of one field in the external form schema. Array rows use dotted paths
/// (`permissions.0.module`), so dots and digits are allowed after the root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldKey(String);

fn is_schema_key(s: &str) -> bool {
    let b = s.as_bytes();
    if b.is_empty() || !b[0].is_ascii_lowercase() {
        return false;
    }
    b.iter().all(|&c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'_' || c == b'.'
    })
}

impl FieldKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ContractViolation> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "field_key",
                reason: "must not be empty",
            });
        }
        if key.len() > 128 {
            return Err(ContractViolation::InvalidValue {
                field: "field_key",
                reason: "must be <= 128 chars",
            });
        }
        if !is_schema_key(&key) {
            return Err(ContractViolation::InvalidValue {
                field: "field_key",
                reason: "must be a dotted lower_snake_case path",
            });
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `other` is this key itself or a dotted descendant of it.
    pub fn owns(&self, other: &FieldKey) -> bool {
        other.0 == self.0
            || (other.0.len() > self.0.len()
                && other.0.starts_with(&self.0)
                && other.0.as_bytes()[self.0.len()] == b'.')
    }
}

/// Shape of the external schema validator's whole-form result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub success: bool,
    pub errors: BTreeMap<FieldKey, String>,
}

impl ValidationReport {
    pub fn v1(
        success: bool,
        errors: BTreeMap<FieldKey, String>,
    ) -> Result<Self, ContractViolation> {
        let report = Self { success, errors };
        report.validate()?;
        Ok(report)
    }

    pub fn clean() -> Self {
        Self {
            success: true,
            errors: BTreeMap::new(),
        }
    }
}

impl Validate for ValidationReport {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.success && !self.errors.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "validation_report",
                reason: "success=true must carry an empty error map",
            });
        }
        if !self.success && self.errors.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "validation_report",
                reason: "success=false must carry at least one error",
            });
        }
        Ok(())
    }
}
