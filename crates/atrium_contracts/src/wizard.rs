#![forbid(unsafe_code)]

use crate::{ContractViolation, Validate};

fn is_lower_snake(s: &str) -> bool {
    let b = s.as_bytes();
    if b.is_empty() || !b[0].is_ascii_lowercase() {
        return false;
    }
    b.iter()
        .all(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'_')
}

/// Identity of one wizard tab. Ordinal order lives in `TabSequence`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "tab_id",
                reason: "must not be empty",
            });
        }
        if id.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "tab_id",
                reason: "must be <= 64 chars",
            });
        }
        if !is_lower_snake(&id) {
            return Err(ContractViolation::InvalidValue {
                field: "tab_id",
                reason: "must be lower_snake_case (a-z0-9_)",
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardTab {
    pub id: TabId,
    pub ordinal: u8,
}

impl WizardTab {
    pub fn v1(id: TabId, ordinal: u8) -> Self {
        Self { id, ordinal }
    }
}

/// Ordered, validated tab definition. Ordinals are contiguous from 0 and
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSequence {
    tabs: Vec<WizardTab>,
}

impl TabSequence {
    pub fn v1(mut tabs: Vec<WizardTab>) -> Result<Self, ContractViolation> {
        if tabs.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "tab_sequence",
                reason: "must contain at least one tab",
            });
        }
        if tabs.len() > u8::MAX as usize {
            return Err(ContractViolation::InvalidValue {
                field: "tab_sequence",
                reason: "too many tabs",
            });
        }
        tabs.sort_by_key(|t| t.ordinal);
        for (i, tab) in tabs.iter().enumerate() {
            if tab.ordinal as usize != i {
                return Err(ContractViolation::InvalidValue {
                    field: "tab_sequence.ordinal",
                    reason: "ordinals must be contiguous from 0",
                });
            }
        }
        for i in 1..tabs.len() {
            if tabs[..i].iter().any(|t| t.id == tabs[i].id) {
                return Err(ContractViolation::InvalidValue {
                    field: "tab_sequence.id",
                    reason: "tab ids must be unique",
                });
            }
        }
        Ok(Self { tabs })
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tabs(&self) -> &[WizardTab] {
        &self.tabs
    }

    pub fn first(&self) -> &WizardTab {
        &self.tabs[0]
    }

    pub fn last(&self) -> &WizardTab {
        &self.tabs[self.tabs.len() - 1]
    }

    pub fn get(&self, id: &TabId) -> Option<&WizardTab> {
        self.tabs.iter().find(|t| &t.id == id)
    }

    pub fn by_ordinal(&self, ordinal: u8) -> Option<&WizardTab> {
        self.tabs.get(ordinal as usize)
    }

    pub fn next_after(&self, id: &TabId) -> Option<&WizardTab> {
        let tab = self.get(id)?;
        self.by_ordinal(tab.ordinal.checked_add(1)?)
    }

    pub fn prev_before(&self, id: &TabId) -> Option<&WizardTab> {
        let tab = self.get(id)?;
        self.by_ordinal(tab.ordinal.checked_sub(1)?)
    }
}

impl Validate for TabSequence {
    fn validate(&self) -> Result<(), ContractViolation> {
        Self::v1(self.tabs.clone()).map(|_| ())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardMode {
    Edit,
    View,
}

/// Reachability of each defined tab, in ordinal order.
///
/// Invariants held by construction: the tab at ordinal 0 is always unlocked,
/// and locking is monotonic downstream (a locked ordinal locks everything
/// after it). Only the wizard navigator mutates this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabUnlockState {
    slots: Vec<(TabId, bool)>,
}

impl TabUnlockState {
    pub fn initial(sequence: &TabSequence, mode: WizardMode) -> Self {
        let slots = sequence
            .tabs()
            .iter()
            .map(|t| {
                let unlocked = match mode {
                    WizardMode::View => true,
                    WizardMode::Edit => t.ordinal == 0,
                };
                (t.id.clone(), unlocked)
            })
            .collect();
        Self { slots }
    }

    pub fn is_unlocked(&self, id: &TabId) -> bool {
        self.slots
            .iter()
            .any(|(slot_id, unlocked)| slot_id == id && *unlocked)
    }

    /// Unlocks the given tab and everything before it.
    pub fn unlock(&mut self, id: &TabId) {
        let Some(pos) = self.slots.iter().position(|(slot_id, _)| slot_id == id) else {
            return;
        };
        for slot in &mut self.slots[..=pos] {
            slot.1 = true;
        }
    }

    /// Locks every tab whose ordinal exceeds the given one.
    pub fn lock_after(&mut self, ordinal: u8) {
        for slot in self.slots.iter_mut().skip(ordinal as usize + 1) {
            slot.1 = false;
        }
    }

    pub fn flags(&self) -> impl Iterator<Item = (&TabId, bool)> {
        self.slots.iter().map(|(id, unlocked)| (id, *unlocked))
    }
}

impl Validate for TabUnlockState {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.slots.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "tab_unlock_state",
                reason: "must cover at least one tab",
            });
        }
        if !self.slots[0].1 {
            return Err(ContractViolation::InvalidValue {
                field: "tab_unlock_state",
                reason: "tab at ordinal 0 must be unlocked",
            });
        }
        let mut seen_locked = false;
        for (_, unlocked) in &self.slots {
            if seen_locked && *unlocked {
                return Err(ContractViolation::InvalidValue {
                    field: "tab_unlock_state",
                    reason: "no tab may be unlocked after a locked tab",
                });
            }
            if !unlocked {
                seen_locked = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: &str, ordinal: u8) -> WizardTab {
        WizardTab::v1(TabId::new(id).unwrap(), ordinal)
    }

    fn sequence() -> TabSequence {
        TabSequence::v1(vec![
            tab("company", 0),
            tab("plan", 1),
            tab("billing", 2),
            tab("review", 3),
        ])
        .unwrap()
    }

    #[test]
    fn at_wiz_01_sequence_rejects_gapped_ordinals() {
        let out = TabSequence::v1(vec![tab("company", 0), tab("plan", 2)]);
        assert!(matches!(
            out,
            Err(ContractViolation::InvalidValue {
                field: "tab_sequence.ordinal",
                ..
            })
        ));
    }

    #[test]
    fn at_wiz_02_sequence_rejects_duplicate_ids() {
        let out = TabSequence::v1(vec![tab("company", 0), tab("company", 1)]);
        assert!(matches!(
            out,
            Err(ContractViolation::InvalidValue {
                field: "tab_sequence.id",
                ..
            })
        ));
    }

    #[test]
    fn at_wiz_03_edit_mode_starts_with_only_first_unlocked() {
        let seq = sequence();
        let state = TabUnlockState::initial(&seq, WizardMode::Edit);
        assert!(state.is_unlocked(&seq.first().id));
        assert!(!state.is_unlocked(&seq.last().id));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn at_wiz_04_view_mode_starts_fully_unlocked() {
        let seq = sequence();
        let state = TabUnlockState::initial(&seq, WizardMode::View);
        assert!(seq.tabs().iter().all(|t| state.is_unlocked(&t.id)));
    }

    #[test]
    fn at_wiz_05_lock_after_locks_everything_downstream() {
        let seq = sequence();
        let mut state = TabUnlockState::initial(&seq, WizardMode::View);
        state.lock_after(1);
        assert!(state.is_unlocked(&seq.by_ordinal(1).unwrap().id));
        assert!(!state.is_unlocked(&seq.by_ordinal(2).unwrap().id));
        assert!(!state.is_unlocked(&seq.by_ordinal(3).unwrap().id));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn at_wiz_06_unlock_backfills_earlier_tabs() {
        let seq = sequence();
        let mut state = TabUnlockState::initial(&seq, WizardMode::Edit);
        state.unlock(&seq.by_ordinal(2).unwrap().id);
        assert!(state.is_unlocked(&seq.by_ordinal(1).unwrap().id));
        assert!(state.validate().is_ok());
    }
}
