#![forbid(unsafe_code)]

use crate::ContractViolation;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKind(String);

impl ResourceKind {
    pub fn new(kind: impl Into<String>) -> Result<Self, ContractViolation> {
        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "resource_kind",
                reason: "must not be empty",
            });
        }
        if kind.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "resource_kind",
                reason: "must be <= 64 chars",
            });
        }
        Ok(Self(kind))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "resource_id",
                reason: "must not be empty",
            });
        }
        if id.len() > 128 {
            return Err(ContractViolation::InvalidValue {
                field: "resource_id",
                reason: "must be <= 128 chars",
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One pending "are you sure" gate. Transient: destroyed on confirm or
/// cancel, silently replaced by a newer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub kind: ResourceKind,
    pub id: ResourceId,
    pub display_name: String,
}

impl PendingConfirmation {
    pub fn v1(
        kind: ResourceKind,
        id: ResourceId,
        display_name: Option<String>,
    ) -> Self {
        let display_name = match display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => format!("Unknown {}", kind.as_str()),
        };
        Self {
            kind,
            id,
            display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_conf_01_missing_name_falls_back_to_unknown_label() {
        let pending = PendingConfirmation::v1(
            ResourceKind::new("addon").unwrap(),
            ResourceId::new("addon_7").unwrap(),
            None,
        );
        assert_eq!(pending.display_name, "Unknown addon");

        let blank = PendingConfirmation::v1(
            ResourceKind::new("branch").unwrap(),
            ResourceId::new("b1").unwrap(),
            Some("   ".to_string()),
        );
        assert_eq!(blank.display_name, "Unknown branch");
    }
}
