#![forbid(unsafe_code)]

use atrium_contracts::confirm::{PendingConfirmation, ResourceId, ResourceKind};
use atrium_contracts::ReasonCodeId;

pub mod reason_codes {
    use atrium_contracts::ReasonCodeId;

    // Confirmation-gate reason-code namespace.
    pub const CF_OK_COMMITTED: ReasonCodeId = ReasonCodeId(0x4346_0001);
    pub const CF_OK_CONFIRMATION_ARMED: ReasonCodeId = ReasonCodeId(0x4346_0002);
    pub const CF_OK_CONFIRMED: ReasonCodeId = ReasonCodeId(0x4346_0003);
    pub const CF_OK_CANCELLED: ReasonCodeId = ReasonCodeId(0x4346_0004);

    pub const CF_REFUSE_NOTHING_PENDING: ReasonCodeId = ReasonCodeId(0x4346_00F1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDecision {
    /// Committed straight away; nothing to confirm.
    Committed,
    /// A confirmation is now pending for the caller to surface.
    ConfirmationArmed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmReport {
    pub decision: ConfirmDecision,
    pub reason_code: ReasonCodeId,
    /// The request this one silently preempted, if any.
    pub replaced: Option<PendingConfirmation>,
}

/// Generic "are you sure" gate for destructive or state-losing actions.
/// At most one confirmation is pending; a newer request replaces the older
/// one (no queue, no merge).
#[derive(Debug, Clone, Default)]
pub struct ConfirmationRuntime {
    pending: Option<PendingConfirmation>,
}

impl ConfirmationRuntime {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    /// A selection toggle. Turning on commits immediately; turning off a
    /// previously selected resource arms a confirmation first.
    pub fn request_toggle(
        &mut self,
        kind: ResourceKind,
        id: ResourceId,
        display_name: Option<String>,
        was_selected: bool,
    ) -> ConfirmReport {
        if !was_selected {
            return ConfirmReport {
                decision: ConfirmDecision::Committed,
                reason_code: reason_codes::CF_OK_COMMITTED,
                replaced: None,
            };
        }
        let replaced = self
            .pending
            .replace(PendingConfirmation::v1(kind, id, display_name));
        ConfirmReport {
            decision: ConfirmDecision::ConfirmationArmed,
            reason_code: reason_codes::CF_OK_CONFIRMATION_ARMED,
            replaced,
        }
    }

    /// A plain removal always confirms, even when the caller cannot resolve
    /// a display name (the label falls back to "Unknown {kind}").
    pub fn request_removal(
        &mut self,
        kind: ResourceKind,
        id: ResourceId,
        display_name: Option<String>,
    ) -> ConfirmReport {
        let replaced = self
            .pending
            .replace(PendingConfirmation::v1(kind, id, display_name));
        ConfirmReport {
            decision: ConfirmDecision::ConfirmationArmed,
            reason_code: reason_codes::CF_OK_CONFIRMATION_ARMED,
            replaced,
        }
    }

    pub fn confirm(&mut self) -> Option<PendingConfirmation> {
        self.pending.take()
    }

    pub fn cancel(&mut self) -> Option<PendingConfirmation> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(s: &str) -> ResourceKind {
        ResourceKind::new(s).unwrap()
    }

    fn id(s: &str) -> ResourceId {
        ResourceId::new(s).unwrap()
    }

    #[test]
    fn at_conf_01_toggle_on_commits_without_confirmation() {
        let mut gate = ConfirmationRuntime::new();
        let out = gate.request_toggle(kind("branch"), id("b1"), Some("Downtown".into()), false);
        assert_eq!(out.decision, ConfirmDecision::Committed);
        assert!(gate.pending().is_none());
    }

    #[test]
    fn at_conf_02_toggle_off_arms_confirmation_with_name() {
        let mut gate = ConfirmationRuntime::new();
        let out = gate.request_toggle(kind("branch"), id("b1"), Some("Downtown".into()), true);
        assert_eq!(out.decision, ConfirmDecision::ConfirmationArmed);
        assert_eq!(gate.pending().unwrap().display_name, "Downtown");
    }

    #[test]
    fn at_conf_03_newer_request_silently_replaces_pending() {
        let mut gate = ConfirmationRuntime::new();
        gate.request_toggle(kind("addon"), id("addon_a"), Some("Reporting".into()), true);
        let out = gate.request_removal(kind("addon"), id("addon_b"), Some("Inventory".into()));
        assert_eq!(
            out.replaced.as_ref().map(|p| p.id.as_str()),
            Some("addon_a")
        );
        // Confirming resolves B only; A was discarded, not queued.
        let resolved = gate.confirm().unwrap();
        assert_eq!(resolved.id.as_str(), "addon_b");
        assert!(gate.confirm().is_none());
    }

    #[test]
    fn at_conf_04_removal_without_name_uses_unknown_label() {
        let mut gate = ConfirmationRuntime::new();
        gate.request_removal(kind("addon"), id("addon_x"), None);
        assert_eq!(gate.pending().unwrap().display_name, "Unknown addon");
    }

    #[test]
    fn at_conf_05_cancel_discards_pending() {
        let mut gate = ConfirmationRuntime::new();
        gate.request_removal(kind("addon"), id("addon_x"), None);
        assert!(gate.cancel().is_some());
        assert!(gate.pending().is_none());
        assert!(gate.cancel().is_none());
    }
}
