//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::PasswordPolicy;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session lifetime (12 hours)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Which passwords registration accepts
    pub password_policy: PasswordPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "club_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(12 * 3600), // 12 hours
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            password_policy: PasswordPolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get session TTL in milliseconds
    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl.as_millis() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Attributes of the session cookie
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            same_site: self.cookie_same_site,
            ..CookieConfig::named(self.session_cookie_name.clone(), self.cookie_secure)
                .with_max_age(self.session_ttl.as_secs() as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.session_ttl_ms(), 12 * 3600 * 1000);
        assert!(config.cookie_secure);
        assert_eq!(config.password_policy, PasswordPolicy::Lenient);
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_random_secret_differs() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_ne!(a.session_secret, b.session_secret);
        assert!(!AuthConfig::development().cookie_secure);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = AuthConfig::development().session_cookie().build_set_cookie("t");
        assert!(cookie.starts_with("club_session=t"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=43200"));
        assert!(!cookie.contains("Secure"));
    }
}
