#![forbid(unsafe_code)]

use atrium_contracts::verify::VerifiableField;
use atrium_contracts::{MonotonicTimeNs, ReasonCodeId};

pub mod reason_codes {
    use atrium_contracts::ReasonCodeId;

    // Verification-gate reason-code namespace.
    pub const VR_OK_SEND_STARTED: ReasonCodeId = ReasonCodeId(0x5652_0001);
    pub const VR_OK_OTP_SENT: ReasonCodeId = ReasonCodeId(0x5652_0002);
    pub const VR_OK_VERIFY_STARTED: ReasonCodeId = ReasonCodeId(0x5652_0003);
    pub const VR_OK_VERIFIED: ReasonCodeId = ReasonCodeId(0x5652_0004);
    pub const VR_OK_SEEDED_VERIFIED: ReasonCodeId = ReasonCodeId(0x5652_0005);

    pub const VR_REFUSE_ALREADY_VERIFIED: ReasonCodeId = ReasonCodeId(0x5652_00F1);
    pub const VR_REFUSE_IN_FLIGHT: ReasonCodeId = ReasonCodeId(0x5652_00F2);
    pub const VR_REFUSE_COOLDOWN_ACTIVE: ReasonCodeId = ReasonCodeId(0x5652_00F3);
    pub const VR_REFUSE_NO_OTP_OUTSTANDING: ReasonCodeId = ReasonCodeId(0x5652_00F4);
    pub const VR_REFUSE_WRONG_STATE: ReasonCodeId = ReasonCodeId(0x5652_00F5);
    pub const VR_FAIL_SEND: ReasonCodeId = ReasonCodeId(0x5652_00F6);
    pub const VR_FAIL_VERIFY: ReasonCodeId = ReasonCodeId(0x5652_00F7);
}

/// In-flight calls are states, not booleans: while `Sending` or `Verifying`
/// a second request for the same field is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyState {
    Unverified,
    Sending,
    OtpSent,
    Verifying,
    Verified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyConfig {
    pub resend_cooldown_secs: u16,
}

impl VerifyConfig {
    pub fn mvp_v1() -> Self {
        Self {
            resend_cooldown_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutputEvent {
    StateChanged { from: VerifyState, to: VerifyState },
    CooldownStarted { until: MonotonicTimeNs },
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifyReport {
    pub accepted: bool,
    pub reason_code: ReasonCodeId,
    pub events: Vec<VerifyOutputEvent>,
}

impl VerifyReport {
    fn refused(reason_code: ReasonCodeId) -> Self {
        Self {
            accepted: false,
            reason_code,
            events: Vec::new(),
        }
    }
}

/// Per-field one-time-code gate. Gates for different fields are independent
/// instances. `Verified` is terminal for the session: the owning flow treats
/// the underlying field as read-only from then on.
#[derive(Debug, Clone)]
pub struct VerifyRuntime {
    field: VerifiableField,
    config: VerifyConfig,
    state: VerifyState,
    cooldown_until: Option<MonotonicTimeNs>,
}

impl VerifyRuntime {
    pub fn new(field: VerifiableField, config: VerifyConfig) -> Self {
        Self {
            field,
            config,
            state: VerifyState::Unverified,
            cooldown_until: None,
        }
    }

    pub fn field(&self) -> VerifiableField {
        self.field
    }

    pub fn state(&self) -> VerifyState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == VerifyState::Verified
    }

    /// Draft resume: a persisted verified flag enters `Verified` directly,
    /// without an OTP_SENT phase. Only valid before anything else happened.
    pub fn seed_verified(&mut self) -> VerifyReport {
        if self.state != VerifyState::Unverified {
            return VerifyReport::refused(reason_codes::VR_REFUSE_WRONG_STATE);
        }
        let events = self.transition_to(VerifyState::Verified);
        VerifyReport {
            accepted: true,
            reason_code: reason_codes::VR_OK_SEEDED_VERIFIED,
            events,
        }
    }

    pub fn begin_send(&mut self, now: MonotonicTimeNs) -> VerifyReport {
        match self.state {
            VerifyState::Verified => {
                VerifyReport::refused(reason_codes::VR_REFUSE_ALREADY_VERIFIED)
            }
            VerifyState::Sending | VerifyState::Verifying => {
                VerifyReport::refused(reason_codes::VR_REFUSE_IN_FLIGHT)
            }
            VerifyState::OtpSent if self.cooldown_active(now) => {
                // Early resend: refuse without resetting the running timer.
                VerifyReport::refused(reason_codes::VR_REFUSE_COOLDOWN_ACTIVE)
            }
            VerifyState::Unverified | VerifyState::OtpSent => {
                let events = self.transition_to(VerifyState::Sending);
                VerifyReport {
                    accepted: true,
                    reason_code: reason_codes::VR_OK_SEND_STARTED,
                    events,
                }
            }
        }
    }

    pub fn send_succeeded(&mut self, now: MonotonicTimeNs) -> VerifyReport {
        if self.state != VerifyState::Sending {
            return VerifyReport::refused(reason_codes::VR_REFUSE_WRONG_STATE);
        }
        let until = now.saturating_add_secs(self.config.resend_cooldown_secs as u32);
        self.cooldown_until = Some(until);
        let mut events = self.transition_to(VerifyState::OtpSent);
        events.push(VerifyOutputEvent::CooldownStarted { until });
        VerifyReport {
            accepted: true,
            reason_code: reason_codes::VR_OK_OTP_SENT,
            events,
        }
    }

    pub fn send_failed(&mut self) -> VerifyReport {
        if self.state != VerifyState::Sending {
            return VerifyReport::refused(reason_codes::VR_REFUSE_WRONG_STATE);
        }
        // A failed resend falls back to OtpSent (an earlier code is still
        // outstanding); a failed first send falls back to Unverified.
        let prior = if self.cooldown_until.is_some() {
            VerifyState::OtpSent
        } else {
            VerifyState::Unverified
        };
        let events = self.transition_to(prior);
        VerifyReport {
            accepted: true,
            reason_code: reason_codes::VR_FAIL_SEND,
            events,
        }
    }

    pub fn begin_verify(&mut self) -> VerifyReport {
        match self.state {
            VerifyState::Verified => {
                VerifyReport::refused(reason_codes::VR_REFUSE_ALREADY_VERIFIED)
            }
            VerifyState::Sending | VerifyState::Verifying => {
                VerifyReport::refused(reason_codes::VR_REFUSE_IN_FLIGHT)
            }
            VerifyState::Unverified => {
                VerifyReport::refused(reason_codes::VR_REFUSE_NO_OTP_OUTSTANDING)
            }
            VerifyState::OtpSent => {
                let events = self.transition_to(VerifyState::Verifying);
                VerifyReport {
                    accepted: true,
                    reason_code: reason_codes::VR_OK_VERIFY_STARTED,
                    events,
                }
            }
        }
    }

    pub fn verify_succeeded(&mut self) -> VerifyReport {
        if self.state != VerifyState::Verifying {
            return VerifyReport::refused(reason_codes::VR_REFUSE_WRONG_STATE);
        }
        // Timer forced to 0 on success.
        self.cooldown_until = None;
        let events = self.transition_to(VerifyState::Verified);
        VerifyReport {
            accepted: true,
            reason_code: reason_codes::VR_OK_VERIFIED,
            events,
        }
    }

    pub fn verify_failed(&mut self) -> VerifyReport {
        if self.state != VerifyState::Verifying {
            return VerifyReport::refused(reason_codes::VR_REFUSE_WRONG_STATE);
        }
        // Stay on the outstanding code; no automatic retry.
        let events = self.transition_to(VerifyState::OtpSent);
        VerifyReport {
            accepted: true,
            reason_code: reason_codes::VR_FAIL_VERIFY,
            events,
        }
    }

    pub fn resend_remaining_secs(&self, now: MonotonicTimeNs) -> u32 {
        let Some(until) = self.cooldown_until else {
            return 0;
        };
        if self.state == VerifyState::Verified {
            return 0;
        }
        let remaining_ns = until.0.saturating_sub(now.0);
        remaining_ns.div_ceil(1_000_000_000) as u32
    }

    /// Cooldown message surfaced by the UI, `mm:ss`.
    pub fn cooldown_display(&self, now: MonotonicTimeNs) -> String {
        let secs = self.resend_remaining_secs(now);
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    fn cooldown_active(&self, now: MonotonicTimeNs) -> bool {
        self.cooldown_until.is_some_and(|until| now.0 < until.0)
    }

    fn transition_to(&mut self, next: VerifyState) -> Vec<VerifyOutputEvent> {
        if self.state == next {
            return Vec::new();
        }
        let from = self.state;
        self.state = next;
        vec![VerifyOutputEvent::StateChanged { from, to: next }]
    }
}
