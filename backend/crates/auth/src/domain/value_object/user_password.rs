//! User Password Value Object
//!
//! Domain wrapper around `platform::password`.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::PasswordPolicy;
//!
//! let raw = RawPassword::new("secret".to_string(), PasswordPolicy::Lenient).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicy};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password for a new account, checked against `policy`
    ///
    /// ## Errors
    /// `BadRequest` carrying the user-facing policy message
    pub fn new(raw: String, policy: PasswordPolicy) -> AppResult<Self> {
        ClearTextPassword::new(raw, policy)
            .map(Self)
            .map_err(|e| AppError::bad_request(e.to_string()))
    }

    /// Password typed at login; never rejected, only compared
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::candidate(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password (Argon2id PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        raw.inner()
            .hash(pepper)
            .map(Self)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|e| {
                AppError::new(
                    ErrorKind::InternalServerError,
                    "Invalid password hash in database",
                )
                .with_source(e)
            })
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `pepper` must match the one used when hashing
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HASHED_PASSWORD]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_policy() {
        assert!(RawPassword::new("secret".to_string(), PasswordPolicy::Lenient).is_ok());
        assert!(RawPassword::new("secret".to_string(), PasswordPolicy::Strict).is_err());
        assert!(RawPassword::new("   ".to_string(), PasswordPolicy::Lenient).is_err());

        let err = RawPassword::new("".to_string(), PasswordPolicy::Lenient).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("secret".to_string(), PasswordPolicy::Lenient).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        assert!(hashed.verify(&raw, None));
        assert!(hashed.verify(&RawPassword::candidate("secret".to_string()), None));
        assert!(!hashed.verify(&RawPassword::candidate("other".to_string()), None));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let raw = RawPassword::new("TestPassword123!".to_string(), PasswordPolicy::Strict).unwrap();
        let hashed = UserPassword::from_raw(&raw, Some(b"pepper")).unwrap();

        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, Some(b"pepper")));
        assert!(UserPassword::from_phc_string("plaintext").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::candidate("SecretPassword123!".to_string());
        let debug = format!("{:?}", raw);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("Secret"));

        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(!format!("{:?}", hashed).contains('$'));
        assert_eq!(hashed.to_string(), "[HASHED_PASSWORD]");
    }
}
