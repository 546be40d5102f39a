#![forbid(unsafe_code)]

//! Wizard session flow: wires the navigation, verification and confirmation
//! engines to draft storage and the external collaborators (OTP provider,
//! submission backend, schema validator).

pub mod collaborators;
pub mod wizard_flow;

pub use collaborators::{OtpService, OtpServiceError, SubmissionCollaborator, SubmissionError};
pub use wizard_flow::WizardFlowRuntime;
