#![forbid(unsafe_code)]

use atrium_contracts::audit::{
    AuditEngine, AuditEventInput, AuditEventType, AuditPayloadMin, AuditSeverity, PayloadKey,
    PayloadValue,
};
use atrium_contracts::confirm::{PendingConfirmation, ResourceId, ResourceKind};
use atrium_contracts::draft::{FormDraft, SubmissionPayload};
use atrium_contracts::pricing::{AddonId, PricingQuote};
use atrium_contracts::verify::{Destination, OtpCode, VerifiableField};
use atrium_contracts::wizard::{TabId, TabSequence, WizardMode};
use atrium_contracts::{ContractViolation, CorrelationId, MonotonicTimeNs, ReasonCodeId, Validate};
use atrium_engines::confirm::{
    reason_codes as confirm_codes, ConfirmDecision, ConfirmReport, ConfirmationRuntime,
};
use atrium_engines::pricing;
use atrium_engines::validation::{SchemaValidator, TabRuleRegistry};
use atrium_engines::verify::{VerifyConfig, VerifyReport, VerifyRuntime};
use atrium_engines::wizard::{
    reason_codes as nav_codes, AdvanceDecision, NavDecision, NavReport, WizardOutputEvent,
    WizardRuntime,
};
use atrium_storage::audit::AuditLedger;
use atrium_storage::store::{DebounceConfig, DebouncedDraftWriter, DraftLoad, DraftStore};

use crate::collaborators::{OtpService, SubmissionCollaborator};

pub mod reason_codes {
    use atrium_contracts::ReasonCodeId;

    // Flow reason-code namespace.
    pub const FL_OK_RESUMED: ReasonCodeId = ReasonCodeId(0x464C_0001);
    pub const FL_OK_DRAFT_SAVED: ReasonCodeId = ReasonCodeId(0x464C_0002);
    pub const FL_OK_SUBMITTED: ReasonCodeId = ReasonCodeId(0x464C_0003);

    pub const FL_REFUSE_PLAN_MISSING: ReasonCodeId = ReasonCodeId(0x464C_00F1);
    pub const FL_REFUSE_SUBMISSION_REJECTED: ReasonCodeId = ReasonCodeId(0x464C_00F2);
    pub const FL_REFUSE_DESTINATION_MISSING: ReasonCodeId = ReasonCodeId(0x464C_00F3);
    pub const FL_FAIL_DRAFT_SAVE: ReasonCodeId = ReasonCodeId(0x464C_00F4);
    pub const FL_FAIL_DRAFT_LOAD: ReasonCodeId = ReasonCodeId(0x464C_00F8);
    pub const FL_FAIL_DRAFT_CLEAR: ReasonCodeId = ReasonCodeId(0x464C_00F5);
    pub const FL_FAIL_OTP_SEND: ReasonCodeId = ReasonCodeId(0x464C_00F6);
    pub const FL_FAIL_OTP_SERVICE: ReasonCodeId = ReasonCodeId(0x464C_00F7);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAdvanceDecision {
    Stayed,
    Advanced,
    Submitted,
    SubmissionRejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowAdvanceReport {
    pub decision: FlowAdvanceDecision,
    pub reason_code: ReasonCodeId,
}

/// What an armed confirmation will do to the draft once confirmed. Tracked
/// next to the confirmation gate so the gate itself stays resource-generic.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingAction {
    DeselectBranch { addon_id: AddonId, branch_index: u16 },
    RemoveAddon { addon_id: AddonId },
}

/// One wizard session. Owns the navigator, the per-field verification gates,
/// the confirmation gate, the working draft and its persistence, and the
/// audit ledger for the session's correlation id. External collaborators are
/// injected per call; the flow itself performs no I/O beyond the draft store
/// it was constructed with.
pub struct WizardFlowRuntime {
    correlation_id: CorrelationId,
    navigator: WizardRuntime,
    registry: TabRuleRegistry,
    email_gate: VerifyRuntime,
    phone_gate: VerifyRuntime,
    confirmations: ConfirmationRuntime,
    pending_action: Option<PendingAction>,
    store: DraftStore,
    writer: DebouncedDraftWriter,
    ledger: AuditLedger,
    draft: FormDraft,
}

impl WizardFlowRuntime {
    pub fn new(
        correlation_id: CorrelationId,
        sequence: TabSequence,
        mode: WizardMode,
        registry: TabRuleRegistry,
        store: DraftStore,
        debounce: DebounceConfig,
        verify: VerifyConfig,
    ) -> Result<Self, ContractViolation> {
        correlation_id.validate()?;
        Ok(Self {
            correlation_id,
            navigator: WizardRuntime::new(sequence, mode),
            registry,
            email_gate: VerifyRuntime::new(VerifiableField::Email, verify),
            phone_gate: VerifyRuntime::new(VerifiableField::Phone, verify),
            confirmations: ConfirmationRuntime::new(),
            pending_action: None,
            store,
            writer: DebouncedDraftWriter::new(debounce),
            ledger: AuditLedger::new(),
            draft: FormDraft::empty(),
        })
    }

    pub fn navigator(&self) -> &WizardRuntime {
        &self.navigator
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn ledger(&self) -> &AuditLedger {
        &self.ledger
    }

    pub fn gate(&self, field: VerifiableField) -> &VerifyRuntime {
        match field {
            VerifiableField::Email => &self.email_gate,
            VerifiableField::Phone => &self.phone_gate,
        }
    }

    pub fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        self.confirmations.pending()
    }

    /// Current quote for the working draft, or `None` before a plan is
    /// chosen.
    pub fn quote(&self) -> Option<PricingQuote> {
        let plan = self.draft.plan.as_ref()?;
        Some(pricing::quote(plan, &self.draft.addons, self.draft.billing_cycle))
    }

    /// Loads a persisted snapshot into the working draft, seeding the
    /// verification gates from its persisted flags. Returns `false` (a clean
    /// start) when nothing usable is stored; a snapshot that exists but
    /// cannot be used leaves a `Warn` row behind.
    pub fn resume(&mut self, now: MonotonicTimeNs) -> bool {
        let loaded = match self.store.try_load() {
            DraftLoad::Missing => return false,
            DraftLoad::Unusable => {
                self.audit_load_failed(now);
                return false;
            }
            DraftLoad::Loaded(loaded) => loaded,
        };
        if loaded.validate().is_err() {
            self.audit_load_failed(now);
            return false;
        }
        self.draft = loaded;
        if self.draft.email_verified {
            self.email_gate.seed_verified();
        }
        if self.draft.phone_verified {
            self.phone_gate.seed_verified();
        }
        self.audit(
            now,
            AuditEngine::Draft,
            AuditEventType::DraftLoaded,
            AuditSeverity::Info,
            reason_codes::FL_OK_RESUMED,
            AuditPayloadMin::empty(),
        );
        true
    }

    /// Absorbs an edited draft from the form layer and schedules a debounced
    /// save. Verified contact fields are read-only: an incoming change to one
    /// is discarded, and the verified flags always mirror the gates.
    pub fn note_field_edit(&mut self, now: MonotonicTimeNs, mut draft: FormDraft) {
        if self.email_gate.is_verified() {
            draft.contact_email = self.draft.contact_email.clone();
        }
        if self.phone_gate.is_verified() {
            draft.contact_phone = self.draft.contact_phone.clone();
        }
        draft.email_verified = self.email_gate.is_verified();
        draft.phone_verified = self.phone_gate.is_verified();
        self.draft = draft;
        self.writer.note_edit(now, self.draft.clone());
    }

    /// Clock pulse. Flushes the debounced draft write once its window has
    /// passed; a failed save degrades to an audit row, never a panic.
    pub fn tick(&mut self, now: MonotonicTimeNs) {
        match self.writer.tick(now, &mut self.store) {
            Some(Ok(())) => self.audit(
                now,
                AuditEngine::Draft,
                AuditEventType::DraftSaved,
                AuditSeverity::Info,
                reason_codes::FL_OK_DRAFT_SAVED,
                AuditPayloadMin::empty(),
            ),
            Some(Err(_)) => self.audit(
                now,
                AuditEngine::Draft,
                AuditEventType::DraftSaveFailed,
                AuditSeverity::Warn,
                reason_codes::FL_FAIL_DRAFT_SAVE,
                AuditPayloadMin::empty(),
            ),
            None => {}
        }
    }

    pub fn request_tab_change(
        &mut self,
        now: MonotonicTimeNs,
        target: &TabId,
        validator: &mut dyn SchemaValidator,
    ) -> Result<NavReport, ContractViolation> {
        let report = self
            .navigator
            .request_tab_change(target, validator, &self.registry)?;
        if report.decision == NavDecision::Refused {
            self.audit(
                now,
                AuditEngine::Navigator,
                AuditEventType::GateFail,
                AuditSeverity::Warn,
                report.reason_code,
                payload(&[("target_tab", PayloadValue::Text(target.as_str().into()))]),
            );
        }
        self.audit_nav_events(now, report.reason_code, &report.events);
        Ok(report)
    }

    pub fn retreat(&mut self, now: MonotonicTimeNs) -> NavReport {
        let report = self.navigator.retreat();
        self.audit_nav_events(now, report.reason_code, &report.events);
        report
    }

    /// Next-button traversal. On any tab but the last this is the navigator's
    /// advance plus auditing; on the last tab an accepted advance assembles
    /// the submission payload, quotes the draft, and hands both to the
    /// submission collaborator. Acceptance clears the persisted draft;
    /// rejection leaves draft and position untouched.
    pub fn advance(
        &mut self,
        now: MonotonicTimeNs,
        validator: &mut dyn SchemaValidator,
        submitter: &mut dyn SubmissionCollaborator,
    ) -> Result<FlowAdvanceReport, ContractViolation> {
        let report = self.navigator.advance(validator, &self.registry)?;
        self.audit_nav_events(now, report.reason_code, &report.events);
        match report.decision {
            AdvanceDecision::Stayed => Ok(FlowAdvanceReport {
                decision: FlowAdvanceDecision::Stayed,
                reason_code: report.reason_code,
            }),
            AdvanceDecision::Advanced => Ok(FlowAdvanceReport {
                decision: FlowAdvanceDecision::Advanced,
                reason_code: report.reason_code,
            }),
            AdvanceDecision::SubmissionRequested => self.submit(now, submitter),
        }
    }

    fn submit(
        &mut self,
        now: MonotonicTimeNs,
        submitter: &mut dyn SubmissionCollaborator,
    ) -> Result<FlowAdvanceReport, ContractViolation> {
        let Some(plan) = self.draft.plan.clone() else {
            self.audit(
                now,
                AuditEngine::Flow,
                AuditEventType::SubmissionRejected,
                AuditSeverity::Warn,
                reason_codes::FL_REFUSE_PLAN_MISSING,
                AuditPayloadMin::empty(),
            );
            return Ok(FlowAdvanceReport {
                decision: FlowAdvanceDecision::Stayed,
                reason_code: reason_codes::FL_REFUSE_PLAN_MISSING,
            });
        };
        let quote = pricing::quote(&plan, &self.draft.addons, self.draft.billing_cycle);
        let payload_v1 = SubmissionPayload::v1(self.draft.clone(), quote)?;

        match submitter.submit(&payload_v1) {
            Ok(()) => {
                self.writer.reset();
                match self.store.clear() {
                    Ok(()) => self.audit(
                        now,
                        AuditEngine::Draft,
                        AuditEventType::DraftCleared,
                        AuditSeverity::Info,
                        reason_codes::FL_OK_SUBMITTED,
                        AuditPayloadMin::empty(),
                    ),
                    Err(_) => self.audit(
                        now,
                        AuditEngine::Draft,
                        AuditEventType::DraftSaveFailed,
                        AuditSeverity::Warn,
                        reason_codes::FL_FAIL_DRAFT_CLEAR,
                        AuditPayloadMin::empty(),
                    ),
                }
                self.audit(
                    now,
                    AuditEngine::Flow,
                    AuditEventType::SubmissionAccepted,
                    AuditSeverity::Info,
                    reason_codes::FL_OK_SUBMITTED,
                    payload(&[(
                        "plan_id",
                        PayloadValue::Text(plan.plan_id.as_str().into()),
                    )]),
                );
                Ok(FlowAdvanceReport {
                    decision: FlowAdvanceDecision::Submitted,
                    reason_code: reason_codes::FL_OK_SUBMITTED,
                })
            }
            Err(_) => {
                self.audit(
                    now,
                    AuditEngine::Flow,
                    AuditEventType::SubmissionRejected,
                    AuditSeverity::Warn,
                    reason_codes::FL_REFUSE_SUBMISSION_REJECTED,
                    AuditPayloadMin::empty(),
                );
                Ok(FlowAdvanceReport {
                    decision: FlowAdvanceDecision::SubmissionRejected,
                    reason_code: reason_codes::FL_REFUSE_SUBMISSION_REJECTED,
                })
            }
        }
    }

    /// Requests a one-time code for the field's current destination. The gate
    /// decides whether a send is admissible (cooldown, in-flight, already
    /// verified) before the provider is ever contacted.
    pub fn send_otp(
        &mut self,
        now: MonotonicTimeNs,
        field: VerifiableField,
        otp: &mut dyn OtpService,
    ) -> VerifyReport {
        let raw = match field {
            VerifiableField::Email => self.draft.contact_email.clone(),
            VerifiableField::Phone => self.draft.contact_phone.clone(),
        };
        let Ok(destination) = Destination::new(raw) else {
            self.audit(
                now,
                AuditEngine::Verify,
                AuditEventType::GateFail,
                AuditSeverity::Warn,
                reason_codes::FL_REFUSE_DESTINATION_MISSING,
                field_payload(field),
            );
            return VerifyReport {
                accepted: false,
                reason_code: reason_codes::FL_REFUSE_DESTINATION_MISSING,
                events: Vec::new(),
            };
        };

        let started = self.gate_mut(field).begin_send(now);
        if !started.accepted {
            return started;
        }
        match otp.send_code(field, &destination) {
            Ok(()) => {
                let report = self.gate_mut(field).send_succeeded(now);
                self.audit(
                    now,
                    AuditEngine::Verify,
                    AuditEventType::OtpSent,
                    AuditSeverity::Info,
                    report.reason_code,
                    field_payload(field),
                );
                report
            }
            Err(_) => {
                let mut report = self.gate_mut(field).send_failed();
                report.accepted = false;
                report.reason_code = reason_codes::FL_FAIL_OTP_SEND;
                self.audit(
                    now,
                    AuditEngine::Verify,
                    AuditEventType::GateFail,
                    AuditSeverity::Warn,
                    reason_codes::FL_FAIL_OTP_SEND,
                    field_payload(field),
                );
                report
            }
        }
    }

    /// Checks an entered code against the provider. Success marks the draft's
    /// verified flag and schedules a save so the flag survives a reload.
    pub fn verify_otp(
        &mut self,
        now: MonotonicTimeNs,
        field: VerifiableField,
        code: &OtpCode,
        otp: &mut dyn OtpService,
    ) -> VerifyReport {
        let started = self.gate_mut(field).begin_verify();
        if !started.accepted {
            return started;
        }
        match otp.verify_code(field, code) {
            Ok(true) => {
                let report = self.gate_mut(field).verify_succeeded();
                match field {
                    VerifiableField::Email => self.draft.email_verified = true,
                    VerifiableField::Phone => self.draft.phone_verified = true,
                }
                self.writer.note_edit(now, self.draft.clone());
                self.audit(
                    now,
                    AuditEngine::Verify,
                    AuditEventType::OtpVerified,
                    AuditSeverity::Info,
                    report.reason_code,
                    field_payload(field),
                );
                report
            }
            Ok(false) => {
                let mut report = self.gate_mut(field).verify_failed();
                report.accepted = false;
                self.audit(
                    now,
                    AuditEngine::Verify,
                    AuditEventType::OtpRejected,
                    AuditSeverity::Warn,
                    report.reason_code,
                    field_payload(field),
                );
                report
            }
            Err(_) => {
                let mut report = self.gate_mut(field).verify_failed();
                report.accepted = false;
                report.reason_code = reason_codes::FL_FAIL_OTP_SERVICE;
                self.audit(
                    now,
                    AuditEngine::Verify,
                    AuditEventType::GateFail,
                    AuditSeverity::Warn,
                    reason_codes::FL_FAIL_OTP_SERVICE,
                    field_payload(field),
                );
                report
            }
        }
    }

    /// Branch checkbox on an add-on. Selecting commits immediately;
    /// deselecting a selected branch arms a confirmation and mutates nothing
    /// until it is confirmed.
    pub fn request_branch_toggle(
        &mut self,
        now: MonotonicTimeNs,
        addon_id: &AddonId,
        branch_index: u16,
        select: bool,
    ) -> Result<ConfirmReport, ContractViolation> {
        let (was_selected, branch_name) = {
            let addon = self
                .draft
                .addons
                .iter()
                .find(|a| &a.addon_id == addon_id)
                .ok_or(ContractViolation::InvalidValue {
                    field: "flow.addon_id",
                    reason: "not a selected add-on",
                })?;
            let branch = addon
                .branches
                .iter()
                .find(|b| b.branch_index == branch_index)
                .ok_or(ContractViolation::InvalidValue {
                    field: "flow.branch_index",
                    reason: "no such branch on the add-on",
                })?;
            (branch.is_selected, branch.branch_name.clone())
        };

        if select {
            if !was_selected {
                self.set_branch_selected(addon_id, branch_index, true);
                self.writer.note_edit(now, self.draft.clone());
            }
            self.audit(
                now,
                AuditEngine::Confirm,
                AuditEventType::ConfirmResolved,
                AuditSeverity::Info,
                confirm_codes::CF_OK_COMMITTED,
                payload(&[("resource", PayloadValue::Text(branch_name))]),
            );
            return Ok(ConfirmReport {
                decision: ConfirmDecision::Committed,
                reason_code: confirm_codes::CF_OK_COMMITTED,
                replaced: None,
            });
        }

        let report = self.confirmations.request_toggle(
            ResourceKind::new("branch")?,
            ResourceId::new(format!("{}/{}", addon_id.as_str(), branch_index))?,
            Some(branch_name.clone()),
            was_selected,
        );
        if report.decision == ConfirmDecision::ConfirmationArmed {
            self.pending_action = Some(PendingAction::DeselectBranch {
                addon_id: addon_id.clone(),
                branch_index,
            });
            self.audit(
                now,
                AuditEngine::Confirm,
                AuditEventType::ConfirmRequested,
                AuditSeverity::Info,
                report.reason_code,
                payload(&[("resource", PayloadValue::Text(branch_name))]),
            );
        }
        Ok(report)
    }

    /// Removing an add-on always confirms first, even when the caller cannot
    /// resolve a display name.
    pub fn request_addon_removal(
        &mut self,
        now: MonotonicTimeNs,
        addon_id: &AddonId,
        display_name: Option<String>,
    ) -> Result<ConfirmReport, ContractViolation> {
        if !self.draft.addons.iter().any(|a| &a.addon_id == addon_id) {
            return Err(ContractViolation::InvalidValue {
                field: "flow.addon_id",
                reason: "not a selected add-on",
            });
        }
        let report = self.confirmations.request_removal(
            ResourceKind::new("addon")?,
            ResourceId::new(addon_id.as_str())?,
            display_name,
        );
        self.pending_action = Some(PendingAction::RemoveAddon {
            addon_id: addon_id.clone(),
        });
        self.audit(
            now,
            AuditEngine::Confirm,
            AuditEventType::ConfirmRequested,
            AuditSeverity::Info,
            report.reason_code,
            payload(&[(
                "resource",
                PayloadValue::Text(addon_id.as_str().into()),
            )]),
        );
        Ok(report)
    }

    /// Applies the armed action to the draft. Only the most recent request is
    /// resolved; anything it replaced was already discarded.
    pub fn confirm_pending(&mut self, now: MonotonicTimeNs) -> Option<PendingConfirmation> {
        let resolved = self.confirmations.confirm()?;
        match self.pending_action.take() {
            Some(PendingAction::DeselectBranch {
                addon_id,
                branch_index,
            }) => self.set_branch_selected(&addon_id, branch_index, false),
            Some(PendingAction::RemoveAddon { addon_id }) => {
                self.draft.addons.retain(|a| a.addon_id != addon_id);
            }
            None => {}
        }
        self.writer.note_edit(now, self.draft.clone());
        self.audit(
            now,
            AuditEngine::Confirm,
            AuditEventType::ConfirmResolved,
            AuditSeverity::Info,
            confirm_codes::CF_OK_CONFIRMED,
            payload(&[(
                "resource",
                PayloadValue::Text(resolved.display_name.clone()),
            )]),
        );
        Some(resolved)
    }

    /// Discards the armed action; the draft is untouched.
    pub fn cancel_pending(&mut self, now: MonotonicTimeNs) -> Option<PendingConfirmation> {
        let discarded = self.confirmations.cancel()?;
        self.pending_action = None;
        self.audit(
            now,
            AuditEngine::Confirm,
            AuditEventType::ConfirmResolved,
            AuditSeverity::Info,
            confirm_codes::CF_OK_CANCELLED,
            payload(&[(
                "resource",
                PayloadValue::Text(discarded.display_name.clone()),
            )]),
        );
        Some(discarded)
    }

    fn audit_load_failed(&mut self, now: MonotonicTimeNs) {
        self.audit(
            now,
            AuditEngine::Draft,
            AuditEventType::DraftLoadFailed,
            AuditSeverity::Warn,
            reason_codes::FL_FAIL_DRAFT_LOAD,
            AuditPayloadMin::empty(),
        );
    }

    fn gate_mut(&mut self, field: VerifiableField) -> &mut VerifyRuntime {
        match field {
            VerifiableField::Email => &mut self.email_gate,
            VerifiableField::Phone => &mut self.phone_gate,
        }
    }

    fn set_branch_selected(&mut self, addon_id: &AddonId, branch_index: u16, selected: bool) {
        if let Some(addon) = self
            .draft
            .addons
            .iter_mut()
            .find(|a| &a.addon_id == addon_id)
        {
            if let Some(branch) = addon
                .branches
                .iter_mut()
                .find(|b| b.branch_index == branch_index)
            {
                branch.is_selected = selected;
            }
        }
    }

    fn audit_nav_events(
        &mut self,
        now: MonotonicTimeNs,
        reason_code: ReasonCodeId,
        events: &[WizardOutputEvent],
    ) {
        for event in events {
            match event {
                WizardOutputEvent::TabChanged { from, to } => self.audit(
                    now,
                    AuditEngine::Navigator,
                    AuditEventType::StateTransition,
                    AuditSeverity::Info,
                    reason_code,
                    payload(&[
                        ("from_tab", PayloadValue::Text(from.as_str().into())),
                        ("to_tab", PayloadValue::Text(to.as_str().into())),
                    ]),
                ),
                WizardOutputEvent::TabUnlocked { tab } => self.audit(
                    now,
                    AuditEngine::Navigator,
                    AuditEventType::GatePass,
                    AuditSeverity::Info,
                    reason_code,
                    payload(&[("tab", PayloadValue::Text(tab.as_str().into()))]),
                ),
                WizardOutputEvent::TabsLockedAfter { ordinal } => self.audit(
                    now,
                    AuditEngine::Navigator,
                    AuditEventType::TabsLocked,
                    AuditSeverity::Warn,
                    reason_code,
                    payload(&[(
                        "last_unlocked_ordinal",
                        PayloadValue::Uint(u64::from(*ordinal)),
                    )]),
                ),
                WizardOutputEvent::SubmissionRequested => self.audit(
                    now,
                    AuditEngine::Navigator,
                    AuditEventType::StateTransition,
                    AuditSeverity::Info,
                    nav_codes::NAV_OK_SUBMISSION_REQUESTED,
                    AuditPayloadMin::empty(),
                ),
            }
        }
    }

    fn audit(
        &mut self,
        at: MonotonicTimeNs,
        engine: AuditEngine,
        event_type: AuditEventType,
        severity: AuditSeverity,
        reason_code: ReasonCodeId,
        payload: AuditPayloadMin,
    ) {
        // Inputs built here are contract-valid by construction; an append can
        // only fail on an invalid input, so the row is dropped rather than
        // failing the operation it describes.
        if let Ok(input) = AuditEventInput::v1(
            at,
            self.correlation_id,
            engine,
            event_type,
            severity,
            reason_code,
            payload,
        ) {
            let _ = self.ledger.append(input);
        }
    }
}

fn payload(entries: &[(&'static str, PayloadValue)]) -> AuditPayloadMin {
    let mut out = AuditPayloadMin::empty();
    for (key, value) in entries {
        if let Ok(k) = PayloadKey::new(*key) {
            out = out.with(k, value.clone()).unwrap_or_default();
        }
    }
    out
}

fn field_payload(field: VerifiableField) -> AuditPayloadMin {
    payload(&[("field", PayloadValue::Text(field.as_str().into()))])
}
