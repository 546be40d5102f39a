#![forbid(unsafe_code)]

use crate::{ContractViolation, Validate};

/// Fields that carry their own one-time-code gate. Gates are independent:
/// email and phone may both be in flight at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VerifiableField {
    Email,
    Phone,
}

impl VerifiableField {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifiableField::Email => "email",
            VerifiableField::Phone => "phone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Destination(String);

impl Destination {
    pub fn new(value: impl Into<String>) -> Result<Self, ContractViolation> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "destination",
                reason: "must not be empty",
            });
        }
        if value.len() > 254 {
            return Err(ContractViolation::InvalidValue {
                field: "destination",
                reason: "must be <= 254 chars",
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn new(code: impl Into<String>) -> Result<Self, ContractViolation> {
        let code = code.into();
        if code.len() < 4 || code.len() > 8 {
            return Err(ContractViolation::InvalidValue {
                field: "otp_code",
                reason: "must be 4..=8 chars",
            });
        }
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ContractViolation::InvalidValue {
                field: "otp_code",
                reason: "must be ASCII digits",
            });
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for OtpCode {
    fn validate(&self) -> Result<(), ContractViolation> {
        Self::new(self.0.clone()).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_vrf_01_otp_code_must_be_short_digit_string() {
        assert!(OtpCode::new("123").is_err());
        assert!(OtpCode::new("123456789").is_err());
        assert!(OtpCode::new("12a456").is_err());
        assert!(OtpCode::new("482913").is_ok());
    }

    #[test]
    fn at_vrf_02_destination_bounds() {
        assert!(Destination::new("").is_err());
        assert!(Destination::new("ops@example.com").is_ok());
        assert!(Destination::new("x".repeat(255)).is_err());
    }
}
