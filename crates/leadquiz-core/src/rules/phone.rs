//! Heuristic, country-aware sanity checks for user-entered phone numbers.
//!
//! Rules run in a fixed order and the first one violated decides the
//! rejection: character set, emptiness, length, repetition, sequence, then
//! the country-specific structure. The numeric sanity checks therefore always
//! win over the structural ones, so `"0000000"` is a repeating pattern rather
//! than a number with a leading zero.
//!
//! The structural step does not aim for E.164 conformance. Users drop the `+`
//! and the country code inconsistently, so the checks only filter shapes that
//! cannot be real. The country-code length used for compact `+` numbers is a
//! guess (one digit for `+1`, two for long numbers, three otherwise); a
//! two-digit code on a short number is read as a three-digit one. That
//! ambiguity is inherent and left as is.

use crate::domain::phone::{phone_digits, PhoneNumber, PhoneRejection, PhoneVerdict};

pub const MIN_DIGITS: usize = 7;
pub const MAX_DIGITS: usize = 15;
pub const MIN_SUBSCRIBER_DIGITS: usize = 6;
pub const MIN_SEQUENCE_WINDOW: usize = 3;

const INDIA_COUNTRY_CODE: &str = "+91";
const INDIA_TRUNK_PREFIX: &str = "91";
const INDIA_SUBSCRIBER_DIGITS: usize = 10;
const INDIA_MOBILE_PREFIXES: [char; 4] = ['6', '7', '8', '9'];

/// Which stretches of the digit string are tested for ascending/descending runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceWindow {
    /// The number is rejected only when all of its digits form one run.
    #[default]
    WholeNumber,
    /// Every contiguous window of this many digits is tested.
    Sliding(usize),
}

/// Tunable phone checks; `PhoneRules::default()` is the canonical rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhoneRules {
    pub sequence_window: SequenceWindow,
}

impl PhoneRules {
    pub fn with_sequence_window(sequence_window: SequenceWindow) -> Self {
        Self { sequence_window }
    }

    pub fn validate(&self, raw: &str) -> PhoneVerdict {
        match self.check(raw) {
            Ok(()) => PhoneVerdict::Valid,
            Err(reason) => PhoneVerdict::Invalid(reason),
        }
    }

    pub fn accept(&self, raw: &str) -> Result<PhoneNumber, PhoneRejection> {
        self.check(raw)?;
        Ok(PhoneNumber::accepted(raw))
    }

    fn check(&self, raw: &str) -> Result<(), PhoneRejection> {
        let trimmed = raw.trim();
        if !trimmed.chars().all(is_phone_char) {
            return Err(PhoneRejection::InvalidCharacters);
        }

        let digits = phone_digits(trimmed);
        if digits.is_empty() {
            return Err(PhoneRejection::Empty);
        }
        if digits.len() < MIN_DIGITS {
            return Err(PhoneRejection::TooShort);
        }
        if digits.len() > MAX_DIGITS {
            return Err(PhoneRejection::TooLong);
        }

        let values: Vec<u8> = digits.bytes().map(|b| b - b'0').collect();
        if is_repeating(&values) {
            return Err(PhoneRejection::RepeatingPattern);
        }
        if self.has_sequence(&values) {
            return Err(PhoneRejection::SequentialPattern);
        }

        check_structure(trimmed, &digits)
    }

    fn has_sequence(&self, values: &[u8]) -> bool {
        match self.sequence_window {
            SequenceWindow::WholeNumber => is_run(values),
            SequenceWindow::Sliding(size) => values
                .windows(size.max(MIN_SEQUENCE_WINDOW))
                .any(is_run),
        }
    }
}

pub fn validate_phone(raw: &str) -> PhoneVerdict {
    PhoneRules::default().validate(raw)
}

fn is_phone_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '+' || is_separator(ch)
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '-' | '(' | ')')
}

fn is_repeating(values: &[u8]) -> bool {
    match values.split_first() {
        Some((first, rest)) => rest.iter().all(|value| value == first),
        None => false,
    }
}

// Ascending runs may wrap 9 -> 0 ("1234567890"); descending runs stop at 0.
fn is_run(values: &[u8]) -> bool {
    if values.len() < 2 {
        return false;
    }
    let ascending = values
        .windows(2)
        .all(|pair| (pair[0] + 1) % 10 == pair[1]);
    let descending = values
        .windows(2)
        .all(|pair| pair[0].checked_sub(1) == Some(pair[1]));
    ascending || descending
}

fn check_structure(trimmed: &str, digits: &str) -> Result<(), PhoneRejection> {
    if let Some(rest) = trimmed.strip_prefix(INDIA_COUNTRY_CODE) {
        return check_indian_subscriber(&phone_digits(rest));
    }

    if let Some(rest) = trimmed.strip_prefix('+') {
        let subscriber = subscriber_digits(rest, digits);
        if subscriber.starts_with('0') {
            return Err(PhoneRejection::LeadingZeroAfterCountryCode);
        }
        if subscriber.len() < MIN_SUBSCRIBER_DIGITS {
            return Err(PhoneRejection::SubscriberTooShort);
        }
        return Ok(());
    }

    if digits.starts_with('0') {
        return Err(PhoneRejection::LeadingZero);
    }

    match digits.len() {
        INDIA_SUBSCRIBER_DIGITS => {
            if has_mobile_prefix(digits) {
                Ok(())
            } else {
                Err(PhoneRejection::InvalidDomesticPrefix)
            }
        }
        12 if digits.starts_with(INDIA_TRUNK_PREFIX) => {
            check_indian_subscriber(&digits[INDIA_TRUNK_PREFIX.len()..])
        }
        _ => Ok(()),
    }
}

fn check_indian_subscriber(subscriber: &str) -> Result<(), PhoneRejection> {
    if subscriber.len() == INDIA_SUBSCRIBER_DIGITS && has_mobile_prefix(subscriber) {
        Ok(())
    } else {
        Err(PhoneRejection::InvalidIndianNumber)
    }
}

fn has_mobile_prefix(digits: &str) -> bool {
    digits.starts_with(INDIA_MOBILE_PREFIXES)
}

/// Digits after the country code of a `+` number (`after_plus` excludes the `+`).
fn subscriber_digits(after_plus: &str, digits: &str) -> String {
    let body = after_plus.trim_start_matches(is_separator);
    let token_len = body
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(body.len());
    let remainder = &body[token_len..];
    if token_len > 0 && remainder.starts_with(is_separator) {
        return phone_digits(remainder);
    }

    let country_code_len = if digits.starts_with('1') {
        1
    } else if digits.len() > 10 {
        2
    } else {
        3
    };
    digits.get(country_code_len..).unwrap_or_default().to_string()
}
