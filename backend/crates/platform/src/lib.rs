//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, random hex)
//! - Password hashing (Argon2id, configurable acceptance policy)
//! - Cookie and flash message handling
//! - Upload file naming and form body reading
//! - Page model and the built-in HTML renderer

pub mod cookie;
pub mod crypto;
pub mod flash;
pub mod form;
pub mod password;
pub mod render;
pub mod upload;
