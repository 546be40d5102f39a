#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::pricing::{BillingCycle, PlanSelection, PricingQuote, SelectedAddon};
use crate::{ContractViolation, SchemaVersion, Validate};

pub const DRAFT_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// Key under which a wizard's draft lives in the durable key/value store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DraftKey(String);

impl DraftKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ContractViolation> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "draft_key",
                reason: "must not be empty",
            });
        }
        if key.len() > 128 {
            return Err(ContractViolation::InvalidValue {
                field: "draft_key",
                reason: "must be <= 128 chars",
            });
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Storage-shaped projection of the in-progress form. Field names are the
/// normalized persistence names, not the live form's. Each save supersedes
/// the previous snapshot whole; there is no merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDraft {
    pub schema_version: u32,
    pub organization_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub billing_cycle: BillingCycle,
    pub plan: Option<PlanSelection>,
    pub addons: Vec<SelectedAddon>,
}

impl FormDraft {
    pub fn empty() -> Self {
        Self {
            schema_version: DRAFT_CONTRACT_VERSION.0,
            organization_name: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            email_verified: false,
            phone_verified: false,
            billing_cycle: BillingCycle::Monthly,
            plan: None,
            addons: Vec::new(),
        }
    }
}

impl Validate for FormDraft {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != DRAFT_CONTRACT_VERSION.0 {
            return Err(ContractViolation::InvalidValue {
                field: "form_draft.schema_version",
                reason: "unsupported draft schema version",
            });
        }
        if self.organization_name.len() > 200 {
            return Err(ContractViolation::InvalidValue {
                field: "form_draft.organization_name",
                reason: "must be <= 200 chars",
            });
        }
        if let Some(plan) = &self.plan {
            plan.validate()?;
        }
        for addon in &self.addons {
            addon.validate()?;
        }
        Ok(())
    }
}

/// Assembled once, on the final tab, after whole-form validation passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub draft: FormDraft,
    pub quote: PricingQuote,
}

impl SubmissionPayload {
    pub fn v1(draft: FormDraft, quote: PricingQuote) -> Result<Self, ContractViolation> {
        draft.validate()?;
        Ok(Self { draft, quote })
    }
}
