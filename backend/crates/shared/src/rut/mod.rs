//! Chilean RUT (Rol Único Tributario)
//!
//! Validation and canonicalization of the national identity number used as
//! the unique key for staff accounts and player records.
//!
//! A RUT is a 7 or 8 digit body plus a modulo-11 check digit (`0`-`9` or
//! `K`). Users type it in many styles (`19.976.194-3`, `19976194-3`,
//! `199761943`); all of them collapse to the canonical `19976194-3`, which
//! is the only form ever persisted.
//!
//! ```
//! use kernel::rut::{self, RutError};
//!
//! let rut = rut::validate("19.976.194-3").unwrap();
//! assert_eq!(rut.canonical(), "19976194-3");
//! assert_eq!(rut.formatted(), "19.976.194-3");
//!
//! assert_eq!(rut::validate("12345678-9"), Err(RutError::ChecksumMismatch));
//! ```

mod error;
mod observer;
mod validator;

pub use error::RutError;
pub use observer::{NoopObserver, RutObserver, TracingObserver};
pub use validator::{RutConfig, RutValidator};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const BODY_MIN_LEN: usize = 7;
const BODY_MAX_LEN: usize = 8;

/// Validated RUT value object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rut {
    body: String,
    check_digit: char,
}

impl Rut {
    /// Digits before the check digit, as supplied
    pub fn body(&self) -> &str {
        &self.body
    }

    /// `0`-`9` or `K`
    pub fn check_digit(&self) -> char {
        self.check_digit
    }

    /// `body-checkDigit`, the persisted form
    pub fn canonical(&self) -> String {
        format!("{}-{}", self.body, self.check_digit)
    }

    /// Human form with thousands separators: `19.976.194-3`
    pub fn formatted(&self) -> String {
        let digits = self.body.as_bytes();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
        for (i, d) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(char::from(*d));
        }
        out.push('-');
        out.push(self.check_digit);
        out
    }

    /// Rebuild from a stored canonical value
    ///
    /// Rows are written only after validation. A stored value that no longer
    /// validates is still loaded, so the record stays readable, but it is
    /// reported.
    pub fn from_db(canonical: &str) -> Self {
        let cleaned = normalize(canonical);
        match parse_normalized(&cleaned) {
            Ok(rut) => rut,
            Err(err) => {
                tracing::warn!(
                    stored = %canonical,
                    reason = err.code(),
                    "Stored RUT does not validate"
                );
                let mut body = cleaned;
                let check_digit = body.pop().unwrap_or('0');
                Self { body, check_digit }
            }
        }
    }

    pub fn into_db(self) -> String {
        self.canonical()
    }
}

/// Validate with the default configuration (lenient, silent)
pub fn validate(raw: &str) -> Result<Rut, RutError> {
    parse_normalized(&normalize(raw))
}

/// Keep only ASCII digits and `K`, uppercased
///
/// Never fails; lookups use it to derive a key from whatever the user typed.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '0'..='9' | 'K' => Some(c),
            'k' => Some('K'),
            _ => None,
        })
        .collect()
}

/// Modulo-11 check digit of a digit-only body
///
/// Weights `2..=7` cycle from the rightmost digit. Remainder 0 gives `0`,
/// remainder 1 gives `K`, anything else `11 - remainder`.
pub fn compute_check_digit(body: &str) -> Result<char, RutError> {
    if body.is_empty() {
        return Err(RutError::TooShort);
    }

    let mut sum: u32 = 0;
    let mut weight: u32 = 2;
    for c in body.chars().rev() {
        let digit = c.to_digit(10).ok_or(RutError::NonNumericBody)?;
        sum += digit * weight;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }

    Ok(match sum % 11 {
        0 => '0',
        1 => 'K',
        r => char::from(b'0' + (11 - r) as u8),
    })
}

/// Structural checks and checksum over an already-normalized string
pub(crate) fn parse_normalized(cleaned: &str) -> Result<Rut, RutError> {
    // cleaned is ASCII only, byte indexing is safe
    if cleaned.len() < 2 {
        return Err(RutError::TooShort);
    }

    let (body, supplied) = cleaned.split_at(cleaned.len() - 1);
    if !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RutError::NonNumericBody);
    }
    if !(BODY_MIN_LEN..=BODY_MAX_LEN).contains(&body.len()) {
        return Err(RutError::InvalidBodyLength);
    }

    let expected = compute_check_digit(body)?;
    let supplied = supplied.chars().next().ok_or(RutError::TooShort)?;
    if !supplied.eq_ignore_ascii_case(&expected) {
        return Err(RutError::ChecksumMismatch);
    }

    Ok(Rut {
        body: body.to_string(),
        check_digit: expected,
    })
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.body, self.check_digit)
    }
}

impl FromStr for Rut {
    type Err = RutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

impl TryFrom<String> for Rut {
    type Error = RutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)
    }
}

impl TryFrom<&str> for Rut {
    type Error = RutError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate(value)
    }
}

impl Serialize for Rut {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rut {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        validate(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &[&str] = &[
        "19976194-3",
        "12345678-5",
        "1234567-4",
        "7654321-6",
        "11111111-1",
        "20000000-5",
        "15000000-9",
        "10000013-K",
        "10000027-K",
        "1000005-K",
        "1000019-K",
        "10000004-0",
        "10000018-0",
    ];

    mod normalization {
        use super::*;

        #[test]
        fn test_strips_punctuation_and_uppercases_k() {
            assert_eq!(normalize("19.976.194-3"), "199761943");
            assert_eq!(normalize(" 10.000.013-k "), "10000013K");
            assert_eq!(normalize("abc"), "");
        }

        #[test]
        fn test_punctuation_styles_share_canonical_form() {
            for canonical in VALID {
                let rut = validate(canonical).unwrap();
                let bare = format!("{}{}", rut.body(), rut.check_digit());
                let dotted = rut.formatted();

                assert_eq!(validate(&bare).unwrap().canonical(), *canonical);
                assert_eq!(validate(&dotted).unwrap().canonical(), *canonical);
                assert_eq!(
                    validate(&canonical.to_lowercase()).unwrap().canonical(),
                    *canonical
                );
            }
        }

        #[test]
        fn test_canonical_round_trip_is_identical() {
            for raw in ["19.976.194-3", "10000013k", "1.000.005-K", " 7654321 6 "] {
                let first = validate(raw).unwrap().canonical();
                let second = validate(&first).unwrap().canonical();
                assert_eq!(first, second);
            }
        }
    }

    mod checksum {
        use super::*;

        #[test]
        fn test_known_check_digits() {
            assert_eq!(compute_check_digit("19976194"), Ok('3'));
            assert_eq!(compute_check_digit("12345678"), Ok('5'));
            assert_eq!(compute_check_digit("10000013"), Ok('K'));
            assert_eq!(compute_check_digit("10000004"), Ok('0'));
        }

        #[test]
        fn test_rejects_non_digits() {
            assert_eq!(compute_check_digit(""), Err(RutError::TooShort));
            assert_eq!(compute_check_digit("12K4"), Err(RutError::NonNumericBody));
        }

        #[test]
        fn test_every_wrong_digit_is_a_mismatch() {
            for canonical in VALID {
                let rut = validate(canonical).unwrap();
                for wrong in "0123456789K".chars().filter(|c| *c != rut.check_digit()) {
                    let raw = format!("{}-{}", rut.body(), wrong);
                    assert_eq!(validate(&raw), Err(RutError::ChecksumMismatch), "{raw}");
                }
            }
        }
    }

    mod structure {
        use super::*;

        #[test]
        fn test_concrete_cases() {
            assert_eq!(validate("19.976.194-3").unwrap().canonical(), "19976194-3");
            assert_eq!(validate("12345678-9"), Err(RutError::ChecksumMismatch));
            assert_eq!(validate("123456-7"), Err(RutError::InvalidBodyLength));
            assert_eq!(validate("1-K"), Err(RutError::InvalidBodyLength));
            assert_eq!(validate("abcdefg-5"), Err(RutError::TooShort));
        }

        #[test]
        fn test_length_boundaries() {
            assert_eq!(validate("5"), Err(RutError::TooShort));
            assert_eq!(validate(""), Err(RutError::TooShort));
            assert_eq!(validate("123456789-0"), Err(RutError::InvalidBodyLength));
        }

        #[test]
        fn test_k_inside_body() {
            assert_eq!(validate("1234K678-5"), Err(RutError::NonNumericBody));
        }

        #[test]
        fn test_body_is_not_repadded() {
            // leading zero adds nothing to the sum but stays in the body
            let padded = validate("01234567-4").unwrap();
            assert_eq!(padded.canonical(), "01234567-4");
            assert_eq!(validate("1234567-4").unwrap().body(), "1234567");
        }
    }

    mod presentation {
        use super::*;

        #[test]
        fn test_formatted() {
            assert_eq!(validate("199761943").unwrap().formatted(), "19.976.194-3");
            assert_eq!(validate("1234567-4").unwrap().formatted(), "1.234.567-4");
        }

        #[test]
        fn test_from_db_keeps_canonical() {
            let rut = Rut::from_db("10000013-K");
            assert_eq!(rut.body(), "10000013");
            assert_eq!(rut.check_digit(), 'K');
            assert_eq!(rut.into_db(), "10000013-K");
        }

        #[test]
        fn test_from_db_loads_corrupt_values() {
            assert_eq!(Rut::from_db("12345678-9").canonical(), "12345678-9");
            assert_eq!(Rut::from_db("").canonical(), "-0");
            assert_eq!(Rut::from_db("19976194-3"), validate("19976194-3").unwrap());
        }

        #[test]
        fn test_serde() {
            let rut: Rut = serde_json::from_str("\"19.976.194-3\"").unwrap();
            assert_eq!(serde_json::to_string(&rut).unwrap(), "\"19976194-3\"");
            assert!(serde_json::from_str::<Rut>("\"12345678-9\"").is_err());
        }

        #[test]
        fn test_from_str_and_try_from() {
            let a: Rut = "12.345.678-5".parse().unwrap();
            let b = Rut::try_from(String::from("123456785")).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.to_string(), "12345678-5");
        }
    }

    mod validator_host {
        use super::*;
        use std::sync::{Arc, Mutex};

        #[derive(Default)]
        struct Recording {
            events: Mutex<Vec<String>>,
        }

        impl RutObserver for Recording {
            fn on_normalized(&self, _raw: &str, cleaned: &str) {
                self.events.lock().unwrap().push(format!("normalized:{cleaned}"));
            }

            fn on_outcome(&self, cleaned: &str, outcome: &Result<Rut, RutError>) {
                let line = match outcome {
                    Ok(rut) => format!("ok:{rut}"),
                    Err(e) => format!("err:{}:{cleaned}", e.code()),
                };
                self.events.lock().unwrap().push(line);
            }
        }

        #[test]
        fn test_default_is_lenient() {
            let validator = RutValidator::default();
            assert!(!validator.config().strict);
            assert_eq!(validator.validate("abcdefg-5"), Err(RutError::TooShort));
            assert_eq!(
                validator.validate("RUT: 19.976.194-3").unwrap().canonical(),
                "19976194-3"
            );
        }

        #[test]
        fn test_strict_rejects_unexpected_characters() {
            let validator = RutValidator::new(RutConfig::strict());
            assert_eq!(
                validator.validate("abcdefg-5"),
                Err(RutError::InvalidCharacter('a'))
            );
            assert_eq!(
                validator.validate(" 19.976.194-3 ").unwrap().canonical(),
                "19976194-3"
            );
            assert_eq!(validator.validate("1-K"), Err(RutError::InvalidBodyLength));
        }

        #[test]
        fn test_observer_sees_normalized_input_and_outcome() {
            let recording = Arc::new(Recording::default());
            let validator = RutValidator::default().with_observer(recording.clone());

            validator.validate("19.976.194-3").unwrap();
            validator.validate("12345678-9").unwrap_err();

            let events = recording.events.lock().unwrap();
            assert_eq!(
                *events,
                vec![
                    "normalized:199761943".to_string(),
                    "ok:19976194-3".to_string(),
                    "normalized:123456789".to_string(),
                    "err:checksum_mismatch:123456789".to_string(),
                ]
            );
        }

        #[test]
        fn test_strict_rejection_reports_cleaned_input() {
            let recording = Arc::new(Recording::default());
            let validator =
                RutValidator::new(RutConfig::strict()).with_observer(recording.clone());

            validator.validate("rut 19.976.194-3").unwrap_err();

            let events = recording.events.lock().unwrap();
            assert_eq!(*events, vec!["err:invalid_character:199761943".to_string()]);
        }

        #[test]
        fn test_tracing_observer_is_selected_by_config() {
            let validator = RutValidator::new(RutConfig::lenient().with_trace(true));
            assert!(validator.config().trace);
            assert!(validator.validate("7654321-6").is_ok());
        }
    }
}
