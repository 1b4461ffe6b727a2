use crate::rules::phone::validate_phone;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a phone number was rejected. Each variant maps to one fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneRejection {
    #[error("Phone number contains invalid characters. Only digits, spaces, +, -, and () are allowed.")]
    InvalidCharacters,
    #[error("Phone number is required.")]
    Empty,
    #[error("Phone number must have at least 7 digits.")]
    TooShort,
    #[error("Phone number must have at most 15 digits.")]
    TooLong,
    #[error("Invalid phone number (repeating digits).")]
    RepeatingPattern,
    #[error("Invalid phone number (sequential pattern).")]
    SequentialPattern,
    #[error("Invalid Indian number. Must be 10 digits starting with 6, 7, 8, or 9.")]
    InvalidIndianNumber,
    #[error("Phone number cannot start with 0 after the country code.")]
    LeadingZeroAfterCountryCode,
    #[error("Phone number is too short after the country code.")]
    SubscriberTooShort,
    #[error("Phone number cannot start with 0. Use the international format, e.g. +49...")]
    LeadingZero,
    #[error("Invalid mobile number. 10-digit numbers must start with 6, 7, 8, or 9.")]
    InvalidDomesticPrefix,
}

impl PhoneRejection {
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidCharacters => "invalid_characters",
            Self::Empty => "empty",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::RepeatingPattern => "repeating_pattern",
            Self::SequentialPattern => "sequential_pattern",
            Self::InvalidIndianNumber => "invalid_indian_number",
            Self::LeadingZeroAfterCountryCode => "leading_zero_after_country_code",
            Self::SubscriberTooShort => "subscriber_too_short",
            Self::LeadingZero => "leading_zero",
            Self::InvalidDomesticPrefix => "invalid_domestic_prefix",
        }
    }
}

/// Outcome of validating one raw phone string: accepted, or the first rule it broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneVerdict {
    Valid,
    Invalid(PhoneRejection),
}

impl PhoneVerdict {
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn rejection(self) -> Option<PhoneRejection> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }

    pub fn into_result(self) -> Result<(), PhoneRejection> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(reason) => Err(reason),
        }
    }
}

/// A phone number exactly as the user typed it, known to pass validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: &str) -> Result<Self, PhoneRejection> {
        validate_phone(raw).into_result()?;
        Ok(Self(raw.to_string()))
    }

    pub(crate) fn accepted(raw: &str) -> Self {
        Self(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
