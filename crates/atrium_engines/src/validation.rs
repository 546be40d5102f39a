#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use atrium_contracts::validation::{FieldKey, ValidationReport};
use atrium_contracts::wizard::TabId;
use atrium_contracts::ContractViolation;

/// Seam to the external form-validation library. `validate_fields` checks
/// just the given schema keys and, on failure, populates field-level errors
/// as a side channel; `validate_all` re-validates the whole form.
pub trait SchemaValidator {
    fn validate_fields(&mut self, keys: &[FieldKey]) -> bool;
    fn validate_all(&mut self) -> ValidationReport;
}

/// What one tab owns, validation-wise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabRule {
    /// The tab owns a flat list of schema keys.
    OwnedFields(Vec<FieldKey>),
    /// The tab owns a dynamic array validated as one unit (single pass/fail,
    /// not per-row results).
    CompositeArray { field_key: FieldKey },
}

impl TabRule {
    fn owns(&self, key: &FieldKey) -> bool {
        match self {
            TabRule::OwnedFields(keys) => keys.iter().any(|k| k == key),
            TabRule::CompositeArray { field_key } => field_key.owns(key),
        }
    }
}

/// Tab-to-validator mapping. Adding a tab kind is a registry entry, not a
/// branch in a central dispatch function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRuleRegistry {
    rules: BTreeMap<TabId, TabRule>,
}

impl TabRuleRegistry {
    pub fn v1(rules: Vec<(TabId, TabRule)>) -> Result<Self, ContractViolation> {
        let mut map = BTreeMap::new();
        for (tab, rule) in rules {
            if map.insert(tab, rule).is_some() {
                return Err(ContractViolation::InvalidValue {
                    field: "tab_rule_registry",
                    reason: "duplicate rule for tab",
                });
            }
        }
        if map.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "tab_rule_registry",
                reason: "must contain at least one rule",
            });
        }
        Ok(Self { rules: map })
    }

    pub fn rule(&self, tab: &TabId) -> Result<&TabRule, ContractViolation> {
        self.rules.get(tab).ok_or(ContractViolation::InvalidValue {
            field: "tab_rule_registry",
            reason: "no rule registered for tab",
        })
    }
}

/// Targeted gate: is this tab's owned field set currently valid.
pub fn tab_passes(rule: &TabRule, validator: &mut dyn SchemaValidator) -> bool {
    match rule {
        TabRule::OwnedFields(keys) => validator.validate_fields(keys),
        TabRule::CompositeArray { field_key } => {
            validator.validate_fields(std::slice::from_ref(field_key))
        }
    }
}

/// Whole-form gate: does the report's error map leave this tab's owned
/// subset untouched. Errors on other tabs do not count against this tab.
pub fn tab_subset_clean(rule: &TabRule, report: &ValidationReport) -> bool {
    report.errors.keys().all(|key| !rule.owns(key))
}
