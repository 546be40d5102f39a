#![forbid(unsafe_code)]

use atrium_contracts::pricing::{
    BillingCycle, PlanSelection, PricingQuote, SelectedAddon,
};
use rust_decimal::Decimal;

const MONTHS_PER_YEAR: u32 = 12;

/// Price of one unit for the billing cycle. Monthly passes the base through;
/// yearly bills twelve months less the annual discount.
pub fn single_addon_price(
    base_price: Decimal,
    cycle: BillingCycle,
    annual_discount_pct: Decimal,
) -> Decimal {
    match cycle {
        BillingCycle::Monthly => base_price,
        BillingCycle::Yearly => {
            base_price
                * Decimal::from(MONTHS_PER_YEAR)
                * (Decimal::ONE - annual_discount_pct / Decimal::ONE_HUNDRED)
        }
    }
}

/// Cost of one add-on. Organization scope is flat regardless of branches;
/// branch scope multiplies by the selected branch count.
pub fn addon_cost(
    addon: &SelectedAddon,
    cycle: BillingCycle,
    annual_discount_pct: Decimal,
) -> Decimal {
    let unit = single_addon_price(addon.addon_price, cycle, annual_discount_pct);
    match addon.pricing_scope {
        atrium_contracts::pricing::PricingScope::Organization => unit,
        atrium_contracts::pricing::PricingScope::Branch => {
            unit * Decimal::from(addon.selected_branch_count())
        }
    }
}

/// Aggregate quote: plan base cost (monthly price x branch count, discounted
/// identically for yearly) plus every selected add-on. Amounts stay exact
/// through accumulation; flooring is display-only.
pub fn quote(
    plan: &PlanSelection,
    addons: &[SelectedAddon],
    cycle: BillingCycle,
) -> PricingQuote {
    let plan_cost = single_addon_price(
        plan.monthly_price * Decimal::from(plan.branch_count),
        cycle,
        plan.annual_discount_pct,
    );

    let addon_costs: Vec<_> = addons
        .iter()
        .map(|addon| {
            (
                addon.addon_id.clone(),
                addon_cost(addon, cycle, plan.annual_discount_pct),
            )
        })
        .collect();

    let total = plan_cost
        + addon_costs
            .iter()
            .fold(Decimal::ZERO, |acc, (_, cost)| acc + cost);

    PricingQuote {
        billing_cycle: cycle,
        plan_cost,
        addon_costs,
        total,
    }
}

/// Floors to whole currency units. Display-time only; never feed the result
/// back into accumulation.
pub fn display_amount(amount: Decimal) -> Decimal {
    amount.floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_contracts::pricing::{
        AddonId, BranchSelection, PlanId, PricingScope,
    };
    use proptest::prelude::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn branch(index: u16, selected: bool) -> BranchSelection {
        BranchSelection::v1(index, format!("Branch {index}"), selected).unwrap()
    }

    fn org_addon(price: i64) -> SelectedAddon {
        SelectedAddon::v1(
            AddonId::new("reporting").unwrap(),
            PricingScope::Organization,
            dec(price),
            vec![branch(0, true), branch(1, false)],
        )
        .unwrap()
    }

    fn branch_addon(price: i64, branches: Vec<BranchSelection>) -> SelectedAddon {
        SelectedAddon::v1(
            AddonId::new("inventory").unwrap(),
            PricingScope::Branch,
            dec(price),
            branches,
        )
        .unwrap()
    }

    fn plan(monthly: i64, discount: i64, branches: u16) -> PlanSelection {
        PlanSelection::v1(
            PlanId::new("growth").unwrap(),
            dec(monthly),
            dec(discount),
            branches,
        )
        .unwrap()
    }

    #[test]
    fn at_cost_01_monthly_single_price_is_base_for_any_discount() {
        for discount in [0, 15, 50, 100] {
            assert_eq!(
                single_addon_price(dec(20), BillingCycle::Monthly, dec(discount)),
                dec(20)
            );
        }
    }

    #[test]
    fn at_cost_02_yearly_single_price_applies_annual_discount() {
        // 20 x 12 x 0.85 = 204
        assert_eq!(
            single_addon_price(dec(20), BillingCycle::Yearly, dec(15)),
            dec(204)
        );
    }

    #[test]
    fn at_cost_03_org_scope_cost_ignores_branch_selection() {
        let mut addon = org_addon(20);
        let base = addon_cost(&addon, BillingCycle::Monthly, dec(0));

        addon.branches = vec![];
        assert_eq!(addon_cost(&addon, BillingCycle::Monthly, dec(0)), base);

        addon.branches = (0..6).map(|i| branch(i, true)).collect();
        assert_eq!(addon_cost(&addon, BillingCycle::Monthly, dec(0)), base);
    }

    #[test]
    fn at_cost_04_branch_scope_cost_counts_selected_branches_only() {
        let addon = branch_addon(15, vec![branch(0, true), branch(1, true), branch(2, false)]);
        assert_eq!(addon_cost(&addon, BillingCycle::Monthly, dec(0)), dec(30));
    }

    #[test]
    fn at_cost_05_monthly_scenario_totals_350() {
        // Plan 100 x 3 branches + org addon 20 + branch addon 15 on 2 of 3.
        let p = plan(100, 15, 3);
        let addons = vec![
            org_addon(20),
            branch_addon(15, vec![branch(0, true), branch(1, true), branch(2, false)]),
        ];
        let q = quote(&p, &addons, BillingCycle::Monthly);
        assert_eq!(q.plan_cost, dec(300));
        assert_eq!(q.total, dec(350));
    }

    #[test]
    fn at_cost_06_yearly_scenario_totals_3570() {
        // Same inputs, yearly, 15% discount: (300 + 20 + 30) x 12 x 0.85.
        let p = plan(100, 15, 3);
        let addons = vec![
            org_addon(20),
            branch_addon(15, vec![branch(0, true), branch(1, true), branch(2, false)]),
        ];
        let q = quote(&p, &addons, BillingCycle::Yearly);
        assert_eq!(q.total, dec(3570));
    }

    #[test]
    fn at_cost_07_no_intermediate_flooring_in_accumulation() {
        // 9.99 yearly at 15%: each exact addon cost is 101.898. Flooring per
        // addon would lose 0.898 x 3 and floor(total) would come out 303, not
        // the correct 305.
        let price = Decimal::new(999, 2);
        let p = PlanSelection::v1(PlanId::new("starter").unwrap(), dec(0), dec(15), 1).unwrap();
        let addons: Vec<_> = (0..3)
            .map(|i| {
                SelectedAddon::v1(
                    AddonId::new(format!("addon_{i}")).unwrap(),
                    PricingScope::Organization,
                    price,
                    vec![],
                )
                .unwrap()
            })
            .collect();
        let q = quote(&p, &addons, BillingCycle::Yearly);

        let floored_early: Decimal = q
            .addon_costs
            .iter()
            .map(|(_, c)| display_amount(*c))
            .sum();
        assert_eq!(display_amount(q.total), dec(305));
        assert_eq!(floored_early, dec(303));
        assert_ne!(display_amount(q.total), floored_early);
    }

    #[test]
    fn at_cost_08_display_amount_floors_to_whole_units() {
        assert_eq!(display_amount(Decimal::new(34999, 2)), dec(349));
        assert_eq!(display_amount(dec(350)), dec(350));
    }

    proptest! {
        #[test]
        fn at_cost_prop_01_org_cost_invariant_under_branch_list_changes(
            price in 0i64..100_000,
            selected in proptest::collection::vec(any::<bool>(), 0..12),
            discount in 0i64..=100,
        ) {
            let branches: Vec<_> = selected
                .iter()
                .enumerate()
                .map(|(i, s)| branch(i as u16, *s))
                .collect();
            let with_branches = SelectedAddon::v1(
                AddonId::new("reporting").unwrap(),
                PricingScope::Organization,
                dec(price),
                branches,
            )
            .unwrap();
            let without = SelectedAddon::v1(
                AddonId::new("reporting").unwrap(),
                PricingScope::Organization,
                dec(price),
                vec![],
            )
            .unwrap();
            for cycle in [BillingCycle::Monthly, BillingCycle::Yearly] {
                prop_assert_eq!(
                    addon_cost(&with_branches, cycle, dec(discount)),
                    addon_cost(&without, cycle, dec(discount))
                );
            }
        }
    }
}
