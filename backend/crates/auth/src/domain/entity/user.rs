//! User Entity
//!
//! An administrator account. Every user has the same single capability.

use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};

/// Persisted user
#[derive(Debug, Clone)]
pub struct User {
    /// Server-assigned identifier
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Login identity (unique, lower-cased)
    pub email: Email,
    /// Argon2id digest, never the plaintext
    pub password_hash: UserPassword,
}

/// User about to be inserted; the id is assigned by the store
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: UserPassword,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: Email, password_hash: UserPassword) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email,
            password_hash,
        }
    }

    pub fn into_user(self, user_id: UserId) -> User {
        User {
            user_id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}
