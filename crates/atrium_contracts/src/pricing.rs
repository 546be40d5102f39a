#![forbid(unsafe_code)]

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ContractViolation, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingScope {
    Organization,
    Branch,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AddonId(String);

impl AddonId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "addon_id",
                reason: "must not be empty",
            });
        }
        if id.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "addon_id",
                reason: "must be <= 64 chars",
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "plan_id",
                reason: "must not be empty",
            });
        }
        if id.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "plan_id",
                reason: "must be <= 64 chars",
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSelection {
    pub branch_index: u16,
    pub branch_name: String,
    pub is_selected: bool,
}

impl BranchSelection {
    pub fn v1(
        branch_index: u16,
        branch_name: impl Into<String>,
        is_selected: bool,
    ) -> Result<Self, ContractViolation> {
        let v = Self {
            branch_index,
            branch_name: branch_name.into(),
            is_selected,
        };
        v.validate()?;
        Ok(v)
    }
}

impl Validate for BranchSelection {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.branch_name.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "branch_selection.branch_name",
                reason: "must not be empty",
            });
        }
        if self.branch_name.len() > 120 {
            return Err(ContractViolation::InvalidValue {
                field: "branch_selection.branch_name",
                reason: "must be <= 120 chars",
            });
        }
        Ok(())
    }
}

/// One add-on attached to the plan selection.
///
/// Organization scope bills once regardless of `branches`; Branch scope bills
/// `addon_price` per selected branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAddon {
    pub addon_id: AddonId,
    pub pricing_scope: PricingScope,
    pub addon_price: Decimal,
    pub branches: Vec<BranchSelection>,
}

impl SelectedAddon {
    pub fn v1(
        addon_id: AddonId,
        pricing_scope: PricingScope,
        addon_price: Decimal,
        branches: Vec<BranchSelection>,
    ) -> Result<Self, ContractViolation> {
        let v = Self {
            addon_id,
            pricing_scope,
            addon_price,
            branches,
        };
        v.validate()?;
        Ok(v)
    }

    pub fn selected_branch_count(&self) -> u32 {
        self.branches.iter().filter(|b| b.is_selected).count() as u32
    }
}

impl Validate for SelectedAddon {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.addon_price.is_sign_negative() {
            return Err(ContractViolation::InvalidValue {
                field: "selected_addon.addon_price",
                reason: "must be >= 0",
            });
        }
        for branch in &self.branches {
            branch.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSelection {
    pub plan_id: PlanId,
    pub monthly_price: Decimal,
    pub annual_discount_pct: Decimal,
    pub branch_count: u16,
}

impl PlanSelection {
    pub fn v1(
        plan_id: PlanId,
        monthly_price: Decimal,
        annual_discount_pct: Decimal,
        branch_count: u16,
    ) -> Result<Self, ContractViolation> {
        let v = Self {
            plan_id,
            monthly_price,
            annual_discount_pct,
            branch_count,
        };
        v.validate()?;
        Ok(v)
    }
}

impl Validate for PlanSelection {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.monthly_price.is_sign_negative() {
            return Err(ContractViolation::InvalidValue {
                field: "plan_selection.monthly_price",
                reason: "must be >= 0",
            });
        }
        if self.annual_discount_pct.is_sign_negative()
            || self.annual_discount_pct > Decimal::ONE_HUNDRED
        {
            return Err(ContractViolation::InvalidValue {
                field: "plan_selection.annual_discount_pct",
                reason: "must be within 0..=100",
            });
        }
        if self.branch_count == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "plan_selection.branch_count",
                reason: "must be >= 1",
            });
        }
        Ok(())
    }
}

/// Aggregate pricing output. Amounts stay exact; flooring to whole currency
/// units happens only in the display helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingQuote {
    pub billing_cycle: BillingCycle,
    pub plan_cost: Decimal,
    pub addon_costs: Vec<(AddonId, Decimal)>,
    pub total: Decimal,
}
