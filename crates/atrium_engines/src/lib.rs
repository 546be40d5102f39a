#![forbid(unsafe_code)]

pub mod confirm;
pub mod pricing;
pub mod validation;
pub mod verify;
pub mod wizard;
