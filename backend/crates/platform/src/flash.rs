//! Flash messages
//!
//! A one-shot notice carried across a redirect in a short-lived cookie and
//! cleared by the next rendered page.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::cookie::extract_cookie;
use crate::crypto::{from_base64url, to_base64url};

/// Name of the cookie carrying the pending flash
pub const FLASH_COOKIE_NAME: &str = "flash";

/// Longest message kept in the cookie
const MAX_FLASH_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, message)
    }

    fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        let mut message: String = message.into();
        if message.len() > MAX_FLASH_LEN {
            let mut cut = MAX_FLASH_LEN;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }
        Self { level, message }
    }

    /// Cookie-safe encoding
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        to_base64url(&json)
    }

    /// Decode a cookie value, `None` for anything that was not produced by
    /// [`Flash::encode`]
    pub fn decode(value: &str) -> Option<Self> {
        let bytes = from_base64url(value).ok()?;
        let flash: Flash = serde_json::from_slice(&bytes).ok()?;
        Some(Self::new(flash.level, flash.message))
    }
}

/// Flash pending for this request, if any
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(pub Option<Flash>);

impl IncomingFlash {
    pub fn into_inner(self) -> Option<Flash> {
        self.0
    }
}

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let flash = extract_cookie(&parts.headers, FLASH_COOKIE_NAME)
            .as_deref()
            .and_then(Flash::decode);
        Ok(IncomingFlash(flash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request, header};

    #[test]
    fn test_encode_decode() {
        let flash = Flash::success("Sponsor added.");
        let encoded = flash.encode();
        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(Flash::decode(&encoded), Some(flash));
    }

    #[test]
    fn test_decode_garbage() {
        assert_eq!(Flash::decode("not base64 at all!"), None);
        assert_eq!(Flash::decode(&to_base64url(b"{\"level\":\"loud\"}")), None);
    }

    #[test]
    fn test_long_message_truncated() {
        let flash = Flash::error("ą".repeat(600));
        assert!(flash.message.len() <= MAX_FLASH_LEN);
        assert!(flash.message.chars().all(|c| c == 'ą'));
    }

    #[tokio::test]
    async fn test_extractor_reads_cookie() {
        let cookie = format!("{}={}", FLASH_COOKIE_NAME, Flash::info("Logged out.").encode());
        let request = Request::builder()
            .header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let IncomingFlash(flash) = IncomingFlash::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(flash, Some(Flash::info("Logged out.")));
    }

    #[tokio::test]
    async fn test_extractor_without_cookie() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let flash = IncomingFlash::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(flash.into_inner().is_none());
    }
}
