#![forbid(unsafe_code)]

use atrium_contracts::wizard::{TabId, TabSequence, TabUnlockState, WizardMode};
use atrium_contracts::{ContractViolation, ReasonCodeId};

use crate::validation::{tab_passes, tab_subset_clean, SchemaValidator, TabRuleRegistry};

pub mod reason_codes {
    use atrium_contracts::ReasonCodeId;

    // Navigator reason-code namespace.
    pub const NAV_OK_TAB_CHANGED: ReasonCodeId = ReasonCodeId(0x4E56_0001);
    pub const NAV_OK_ADVANCED: ReasonCodeId = ReasonCodeId(0x4E56_0002);
    pub const NAV_OK_SUBMISSION_REQUESTED: ReasonCodeId = ReasonCodeId(0x4E56_0003);
    pub const NAV_OK_RETREATED: ReasonCodeId = ReasonCodeId(0x4E56_0004);
    pub const NAV_OK_VIEW_SWITCH: ReasonCodeId = ReasonCodeId(0x4E56_0005);

    pub const NAV_REFUSE_ACTIVE_TAB_INVALID: ReasonCodeId = ReasonCodeId(0x4E56_00F1);
    pub const NAV_REFUSE_TARGET_LOCKED: ReasonCodeId = ReasonCodeId(0x4E56_00F2);
    pub const NAV_REFUSE_AT_FIRST_TAB: ReasonCodeId = ReasonCodeId(0x4E56_00F3);
    pub const NAV_REFUSE_VIEW_MODE_SUBMIT: ReasonCodeId = ReasonCodeId(0x4E56_00F4);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutputEvent {
    TabChanged { from: TabId, to: TabId },
    TabUnlocked { tab: TabId },
    TabsLockedAfter { ordinal: u8 },
    SubmissionRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDecision {
    Switched,
    Refused,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavReport {
    pub decision: NavDecision,
    pub reason_code: ReasonCodeId,
    pub events: Vec<WizardOutputEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceDecision {
    Stayed,
    Advanced,
    SubmissionRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceReport {
    pub decision: AdvanceDecision,
    pub reason_code: ReasonCodeId,
    pub events: Vec<WizardOutputEvent>,
}

/// Tab-sequenced navigator: owns the active tab and the unlock state, and is
/// the only mutator of either. Validation is delegated through the rule
/// registry; submission itself is delegated to the owning flow.
#[derive(Debug, Clone)]
pub struct WizardRuntime {
    mode: WizardMode,
    sequence: TabSequence,
    active: TabId,
    unlock: TabUnlockState,
}

impl WizardRuntime {
    pub fn new(sequence: TabSequence, mode: WizardMode) -> Self {
        let active = sequence.first().id.clone();
        let unlock = TabUnlockState::initial(&sequence, mode);
        Self {
            mode,
            sequence,
            active,
            unlock,
        }
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn active_tab(&self) -> &TabId {
        &self.active
    }

    pub fn sequence(&self) -> &TabSequence {
        &self.sequence
    }

    pub fn unlock_state(&self) -> &TabUnlockState {
        &self.unlock
    }

    pub fn is_on_last_tab(&self) -> bool {
        self.active == self.sequence.last().id
    }

    /// Direct tab-click navigation. Validates the active tab's owned field
    /// set only (not the whole form); `advance` is the thorough path.
    pub fn request_tab_change(
        &mut self,
        target: &TabId,
        validator: &mut dyn SchemaValidator,
        registry: &TabRuleRegistry,
    ) -> Result<NavReport, ContractViolation> {
        if self.sequence.get(target).is_none() {
            return Err(ContractViolation::InvalidValue {
                field: "wizard.target_tab",
                reason: "not a defined tab",
            });
        }

        if self.mode == WizardMode::View {
            let events = self.switch_to(target);
            return Ok(NavReport {
                decision: NavDecision::Switched,
                reason_code: reason_codes::NAV_OK_VIEW_SWITCH,
                events,
            });
        }

        let rule = registry.rule(&self.active)?;
        if !tab_passes(rule, validator) {
            let ordinal = self.active_ordinal();
            self.unlock.lock_after(ordinal);
            return Ok(NavReport {
                decision: NavDecision::Refused,
                reason_code: reason_codes::NAV_REFUSE_ACTIVE_TAB_INVALID,
                events: vec![WizardOutputEvent::TabsLockedAfter { ordinal }],
            });
        }

        if !self.unlock.is_unlocked(target) {
            // Target not reachable: active tab unchanged, no lock mutation.
            return Ok(NavReport {
                decision: NavDecision::Refused,
                reason_code: reason_codes::NAV_REFUSE_TARGET_LOCKED,
                events: Vec::new(),
            });
        }

        let events = self.switch_to(target);
        Ok(NavReport {
            decision: NavDecision::Switched,
            reason_code: reason_codes::NAV_OK_TAB_CHANGED,
            events,
        })
    }

    /// Next-button traversal. Re-validates the entire form to populate
    /// field errors, then gates only on the active tab's owned subset of
    /// the error map, so an error on an earlier, already-passed tab does
    /// not block advancing. `request_tab_change` validates the active tab
    /// alone; the asymmetry is intentional and kept as observed.
    pub fn advance(
        &mut self,
        validator: &mut dyn SchemaValidator,
        registry: &TabRuleRegistry,
    ) -> Result<AdvanceReport, ContractViolation> {
        if self.mode == WizardMode::View {
            return Ok(self.advance_view_mode());
        }

        let report = validator.validate_all();
        let rule = registry.rule(&self.active)?;

        if !tab_subset_clean(rule, &report) {
            let ordinal = self.active_ordinal();
            self.unlock.lock_after(ordinal);
            return Ok(AdvanceReport {
                decision: AdvanceDecision::Stayed,
                reason_code: reason_codes::NAV_REFUSE_ACTIVE_TAB_INVALID,
                events: vec![WizardOutputEvent::TabsLockedAfter { ordinal }],
            });
        }

        match self.sequence.next_after(&self.active) {
            Some(next) => {
                let next_id = next.id.clone();
                self.unlock.unlock(&next_id);
                let mut events = vec![WizardOutputEvent::TabUnlocked {
                    tab: next_id.clone(),
                }];
                events.extend(self.switch_to(&next_id));
                Ok(AdvanceReport {
                    decision: AdvanceDecision::Advanced,
                    reason_code: reason_codes::NAV_OK_ADVANCED,
                    events,
                })
            }
            None => Ok(AdvanceReport {
                decision: AdvanceDecision::SubmissionRequested,
                reason_code: reason_codes::NAV_OK_SUBMISSION_REQUESTED,
                events: vec![WizardOutputEvent::SubmissionRequested],
            }),
        }
    }

    /// Previous-button traversal. Never mutates lock state.
    pub fn retreat(&mut self) -> NavReport {
        match self.sequence.prev_before(&self.active) {
            Some(prev) => {
                let prev_id = prev.id.clone();
                let events = self.switch_to(&prev_id);
                NavReport {
                    decision: NavDecision::Switched,
                    reason_code: reason_codes::NAV_OK_RETREATED,
                    events,
                }
            }
            None => NavReport {
                decision: NavDecision::Refused,
                reason_code: reason_codes::NAV_REFUSE_AT_FIRST_TAB,
                events: Vec::new(),
            },
        }
    }

    fn advance_view_mode(&mut self) -> AdvanceReport {
        match self.sequence.next_after(&self.active) {
            Some(next) => {
                let next_id = next.id.clone();
                let events = self.switch_to(&next_id);
                AdvanceReport {
                    decision: AdvanceDecision::Advanced,
                    reason_code: reason_codes::NAV_OK_ADVANCED,
                    events,
                }
            }
            // View mode never submits.
            None => AdvanceReport {
                decision: AdvanceDecision::Stayed,
                reason_code: reason_codes::NAV_REFUSE_VIEW_MODE_SUBMIT,
                events: Vec::new(),
            },
        }
    }

    fn active_ordinal(&self) -> u8 {
        self.sequence
            .get(&self.active)
            .map(|t| t.ordinal)
            .unwrap_or(0)
    }

    fn switch_to(&mut self, target: &TabId) -> Vec<WizardOutputEvent> {
        if &self.active == target {
            return Vec::new();
        }
        let from = self.active.clone();
        self.active = target.clone();
        vec![WizardOutputEvent::TabChanged {
            from,
            to: target.clone(),
        }]
    }
}
