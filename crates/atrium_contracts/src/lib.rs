#![forbid(unsafe_code)]

pub mod audit;
pub mod common;
pub mod confirm;
pub mod draft;
pub mod pricing;
pub mod validation;
pub mod verify;
pub mod wizard;

pub use common::{
    ContractViolation, CorrelationId, MonotonicTimeNs, ReasonCodeId, SchemaVersion, Validate,
};
