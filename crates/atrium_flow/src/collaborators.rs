#![forbid(unsafe_code)]

use atrium_contracts::draft::SubmissionPayload;
use atrium_contracts::verify::{Destination, OtpCode, VerifiableField};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpServiceError {
    /// The provider could not be reached or answered with a transport error.
    Unavailable,
    /// The provider refused the request outright (rate limit, bad number).
    Rejected { reason: String },
}

/// One-time-code provider boundary. The flow drives the gate state machine;
/// implementations only move codes across the wire.
pub trait OtpService {
    fn send_code(
        &mut self,
        field: VerifiableField,
        destination: &Destination,
    ) -> Result<(), OtpServiceError>;

    /// `Ok(false)` is a wrong code, an expected user outcome. `Err` is the
    /// provider itself failing.
    fn verify_code(
        &mut self,
        field: VerifiableField,
        code: &OtpCode,
    ) -> Result<bool, OtpServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    Unavailable,
    Rejected { reason: String },
}

/// Final-submission boundary, invoked at most once per accepted advance off
/// the last tab.
pub trait SubmissionCollaborator {
    fn submit(&mut self, payload: &SubmissionPayload) -> Result<(), SubmissionError>;
}
