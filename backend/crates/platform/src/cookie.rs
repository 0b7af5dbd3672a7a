//! Cookie Management Infrastructure
//!
//! Cookie attributes shared by the session cookie and the flash cookie.

use axum::http::{HeaderMap, HeaderValue, header};

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Site-wide cookie with the given name
    pub fn named(name: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
            ..Self::default()
        }
    }

    pub fn with_max_age(mut self, secs: i64) -> Self {
        self.max_age_secs = Some(secs);
        self
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);
        self.push_attributes(&mut cookie);

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build Set-Cookie header value that expires the cookie immediately
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);
        self.push_attributes(&mut cookie);
        cookie.push_str("; Max-Age=0");
        cookie
    }

    fn push_attributes(&self, cookie: &mut String) {
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));
    }
}

/// Extract a cookie value from headers
///
/// Looks through every `Cookie` header, HTTP/2 clients may send several.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

/// Set-Cookie header value carrying `value`
///
/// `None` when the value contains bytes not allowed in a header.
pub fn set_cookie_header(config: &CookieConfig, value: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&config.build_set_cookie(value)).ok()
}

/// Set-Cookie header value removing the cookie
pub fn delete_cookie_header(config: &CookieConfig) -> Option<HeaderValue> {
    HeaderValue::from_str(&config.build_delete_cookie()).ok()
}
