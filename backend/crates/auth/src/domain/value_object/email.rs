//! Email Value Object
//!
//! Login identity of a user. Stored lower-cased so uniqueness is
//! case-insensitive.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use kernel::validation::is_valid_email;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Column width of `users.email`
pub const EMAIL_MAX_LENGTH: usize = 250;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("Email cannot be empty"));
        }

        if email.chars().count() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        if !is_valid_email(&email) {
            return Err(AppError::bad_request("Invalid email format"));
        }

        Ok(Self(email))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }

    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("user@example.com").is_ok());
        assert!(Email::new("user.name@example.co.jp").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("").is_err());
        assert!(Email::new("userexample.com").is_err());
        assert!(Email::new("user@").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@@example.com").is_err());
        assert!(Email::new("user@example").is_err());
    }

    #[test]
    fn test_email_too_long() {
        let local = "a".repeat(60);
        let domain = format!("{}.com", "b".repeat(200));
        assert!(Email::new(format!("{}@{}", local, domain)).is_err());
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::new("  Ann@Club.Example ").unwrap();
        assert_eq!(email.as_str(), "ann@club.example");
        assert_eq!(email.to_string(), "ann@club.example");
        assert_eq!(email.domain(), "club.example");
    }
}
