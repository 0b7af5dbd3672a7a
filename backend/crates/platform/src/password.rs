//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of sensitive data
//! - Configurable acceptance policy ([`PasswordPolicy`])
//!
//! ## Security Features
//! - Random salt per hash, so equal passwords never share a digest
//! - Zeroization prevents memory inspection attacks
//! - Pepper support for additional security layer

use std::fmt;
use std::str::FromStr;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length under [`PasswordPolicy::Strict`] (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Policy
// ============================================================================

/// Which passwords are accepted when an account is created
///
/// `Lenient` only rejects blank, oversized or control-character input.
/// `Strict` adds the NIST SP 800-63B length floor and the common pattern list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordPolicy {
    #[default]
    Lenient,
    Strict,
}

impl FromStr for PasswordPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(PasswordPolicy::Lenient),
            "strict" => Ok(PasswordPolicy::Strict),
            other => Err(format!("unknown password policy `{}`", other)),
        }
    }
}

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

    /// Sequential, repeated, keyboard walk or well-known password
    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Password hashing errors
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
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::{ClearTextPassword, PasswordPolicy};
///
/// let password = ClearTextPassword::new("secret".to_string(), PasswordPolicy::Lenient).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password checked against `policy`
    ///
    /// Unicode is normalized using NFKC before validation.
    pub fn new(raw: String, policy: PasswordPolicy) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Unicode code points, not bytes
        let char_count = normalized.chars().count();

        if policy == PasswordPolicy::Strict && char_count < MIN_PASSWORD_LENGTH {
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

        // Space, tab and newline are allowed
        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if policy == PasswordPolicy::Strict && is_common_pattern(&normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(Self(normalized))
    }

    /// Wrap a login candidate without applying any policy
    ///
    /// Only normalizes; verification then simply fails for input that could
    /// never have been stored.
    pub fn candidate(raw: String) -> Self {
        Self(raw.nfkc().collect())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret for additional security
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let mut password_bytes = peppered(self, pepper);

        // 128-bit random salt
        let salt = SaltString::generate(OsRng);

        // OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
        let argon2 = Argon2::default();

        let result = argon2
            .hash_password(&password_bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        password_bytes.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

fn peppered(password: &ClearTextPassword, pepper: Option<&[u8]>) -> Vec<u8> {
    let mut bytes = password.as_bytes().to_vec();
    if let Some(p) = pepper {
        bytes.extend_from_slice(p);
    }
    bytes
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string carries algorithm, version, parameters, salt and hash, so
/// verification needs nothing else.
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
    /// Never fails: a malformed digest simply does not match.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        let mut password_bytes = peppered(password, pepper);

        // Argon2 uses constant-time comparison internally
        let matched = Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok();

        password_bytes.zeroize();
        matched
    }

    /// Check if the hash needs to be rehashed
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

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    // All same character (e.g., "aaaaaaaa")
    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if lower.chars().count() >= 3 && chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &[
        "qwerty",
        "qwertyuiop",
        "asdfgh",
        "asdfghjkl",
        "zxcvbn",
        "qazwsx",
        "1qaz2wsx",
    ];

    if KEYBOARD_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "12345678",
        "123456789",
        "1234567890",
        "abcdefgh",
        "letmein",
        "welcome",
        "admin123",
        "iloveyou",
        "sunshine",
        "princess",
        "football",
        "baseball",
        "trustno1",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

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

// ============================================================================
// Tests
// ============================================================================
