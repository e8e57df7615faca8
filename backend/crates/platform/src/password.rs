//! Password Hashing and Verification
//!
//! NIST SP 800-63B style password handling:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - NFKC normalization before length checks
//! - Zeroization of clear text on drop
//! - Rejection of predictable passwords, including ones built from the
//!   account's own identifiers (RUT, names)

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Identifier fragments shorter than this are not checked for similarity
const MIN_IDENTIFIER_LENGTH: usize = 4;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,

    /// Password is entirely numeric
    #[error("Password cannot be entirely numeric")]
    NumericOnly,

    /// Password contains the user's RUT or name
    #[error("Password is too similar to your personal information")]
    SimilarToIdentifier,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; debug output is redacted.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("Kine#Sala2024".to_string()).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Unicode is normalized using NFKC before validation.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // NIST: count code points, not bytes
        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(&normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        if normalized.chars().all(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::NumericOnly);
        }

        Ok(Self(normalized))
    }

    /// Parse a submitted password for verification only (no policy)
    ///
    /// Login must accept whatever was stored before a policy change.
    pub fn for_verification(raw: String) -> Self {
        Self(raw.nfkc().collect())
    }

    /// Reject passwords that contain one of the given identifiers
    ///
    /// Comparison is case-insensitive and ignores punctuation, so a RUT
    /// typed as `12.345.678` still matches.
    pub fn ensure_not_similar<'a>(
        &self,
        identifiers: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), PasswordPolicyError> {
        let password = squash(&self.0);
        for identifier in identifiers {
            let identifier = squash(identifier);
            if identifier.chars().count() >= MIN_IDENTIFIER_LENGTH && password.contains(&identifier)
            {
                return Err(PasswordPolicyError::SimilarToIdentifier);
            }
        }
        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    ///
    /// `pepper` is an optional application-wide secret appended before hashing.
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let password_bytes = with_pepper(self.as_bytes(), pepper);

        let salt = SaltString::generate(OsRng);

        // OWASP defaults: m=19456 (19 MiB), t=2, p=1
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// `pepper` must match the one used during hashing.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let password_bytes = with_pepper(password.as_bytes(), pepper);

        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        // constant-time inside argon2
        Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok()
    }

    /// True if the stored hash is not Argon2id
    pub fn needs_rehash(&self) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => parsed.algorithm != argon2::Algorithm::Argon2id.ident(),
            Err(_) => true,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn with_pepper(password: &[u8], pepper: Option<&[u8]>) -> Vec<u8> {
    let mut combined = password.to_vec();
    if let Some(p) = pepper {
        combined.extend_from_slice(p);
    }
    combined
}

/// Lowercase alphanumerics only
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    // "aaaaaaaa"
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];
    if KEYBOARD_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "contraseña",
        "contrasena",
        "abcdefgh",
        "letmein",
        "welcome",
        "admin123",
        "iloveyou",
        "football",
        "futbol123",
        "santiago",
        "colocolo",
        "trustno1",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// "12345678", "98765432"
fn is_sequential_numbers(s: &str) -> bool {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 4 || digits.len() != s.chars().count() {
        return false;
    }

    let is_ascending = digits
        .windows(2)
        .all(|w| w[1] == w[0] + 1 || (w[0] == 9 && w[1] == 0));
    let is_descending = digits
        .windows(2)
        .all(|w| w[0] == w[1] + 1 || (w[0] == 0 && w[1] == 9));

    is_ascending || is_descending
}

#[cfg(test)]
mod tests {
    use super::*;

    mod policy {
        use super::*;

        #[test]
        fn test_too_short() {
            let result = ClearTextPassword::new("short".to_string());
            assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
        }

        #[test]
        fn test_too_long() {
            let result = ClearTextPassword::new("ab".repeat(MAX_PASSWORD_LENGTH));
            assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
        }

        #[test]
        fn test_empty_or_whitespace() {
            assert_eq!(
                ClearTextPassword::new(String::new()).unwrap_err(),
                PasswordPolicyError::EmptyOrWhitespace
            );
            assert_eq!(
                ClearTextPassword::new(" ".repeat(10)).unwrap_err(),
                PasswordPolicyError::EmptyOrWhitespace
            );
        }

        #[test]
        fn test_common_patterns() {
            for raw in ["password123", "qwertyuiop", "12345678", "aaaaaaaaaa", "Futbol123"] {
                assert_eq!(
                    ClearTextPassword::new(raw.to_string()).unwrap_err(),
                    PasswordPolicyError::CommonPattern,
                    "{raw}"
                );
            }
        }

        #[test]
        fn test_numeric_only() {
            assert_eq!(
                ClearTextPassword::new("19283746".to_string()).unwrap_err(),
                PasswordPolicyError::NumericOnly
            );
        }

        #[test]
        fn test_valid_passwords() {
            assert!(ClearTextPassword::new("Kine#Sala2024".to_string()).is_ok());
            assert!(ClearTextPassword::new("camilla gimnasio reintegro".to_string()).is_ok());
            assert!(ClearTextPassword::new("pañoleta-ñandú".to_string()).is_ok());
        }

        #[test]
        fn test_similar_to_identifier() {
            let password = ClearTextPassword::new("Soto19976194x".to_string()).unwrap();
            assert_eq!(
                password.ensure_not_similar(["19.976.194"]),
                Err(PasswordPolicyError::SimilarToIdentifier)
            );
            assert_eq!(
                password.ensure_not_similar(["Soto"]),
                Err(PasswordPolicyError::SimilarToIdentifier)
            );
            // fragments under four chars are ignored
            assert!(password.ensure_not_similar(["x", "So"]).is_ok());
            assert!(password.ensure_not_similar(["12345678", "Pérez"]).is_ok());
        }
    }

    mod hashing {
        use super::*;

        #[test]
        fn test_hash_and_verify() {
            let password = ClearTextPassword::for_verification("TestPassword123!".to_string());
            let hashed = password.hash(None).unwrap();

            assert!(hashed.verify(&password, None));

            let wrong = ClearTextPassword::for_verification("WrongPassword123!".to_string());
            assert!(!hashed.verify(&wrong, None));
            assert!(!hashed.needs_rehash());
        }

        #[test]
        fn test_hash_with_pepper() {
            let password = ClearTextPassword::for_verification("TestPassword123!".to_string());
            let pepper = b"clinic_pepper";
            let hashed = password.hash(Some(pepper)).unwrap();

            assert!(hashed.verify(&password, Some(pepper)));
            assert!(!hashed.verify(&password, None));
            assert!(!hashed.verify(&password, Some(b"wrong_pepper")));
        }

        #[test]
        fn test_phc_string_roundtrip() {
            let password = ClearTextPassword::for_verification("TestPassword123!".to_string());
            let hashed = password.hash(None).unwrap();

            let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
            assert!(restored.verify(&password, None));
        }

        #[test]
        fn test_invalid_phc_string() {
            assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
        }

        #[test]
        fn test_debug_redaction() {
            let password = ClearTextPassword::for_verification("secret".to_string());
            let debug_output = format!("{:?}", password);
            assert!(debug_output.contains("REDACTED"));
            assert!(!debug_output.contains("secret"));
        }
    }
}
