//! Session token format
//!
//! `<session uuid>.<base64url(HMAC-SHA256(secret, session uuid))>`

use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Sign a session id into a cookie token
pub fn sign(secret: &[u8; 32], session_id: Uuid) -> String {
    let session_id = session_id.to_string();
    let signature = hmac_sha256(secret, session_id.as_bytes());
    format!("{}.{}", session_id, to_base64url(&signature))
}

/// Parse and verify session token
pub fn verify(secret: &[u8; 32], token: &str) -> AuthResult<Uuid> {
    let (session_id_str, signature_b64) =
        token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let signature = from_base64url(signature_b64).map_err(|_| AuthError::SessionInvalid)?;

    if !verify_hmac_sha256(secret, session_id_str.as_bytes(), &signature) {
        return Err(AuthError::SessionInvalid);
    }

    session_id_str
        .parse()
        .map_err(|_| AuthError::SessionInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_sign_then_verify() {
        let id = Uuid::new_v4();
        let token = sign(&SECRET, id);
        assert_eq!(verify(&SECRET, &token).unwrap(), id);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let id = Uuid::new_v4();
        let token = sign(&SECRET, id);
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), signature);

        assert!(matches!(verify(&SECRET, &forged), Err(AuthError::SessionInvalid)));
        assert!(matches!(verify(&[8u8; 32], &token), Err(AuthError::SessionInvalid)));
        assert!(matches!(verify(&SECRET, "garbage"), Err(AuthError::SessionInvalid)));
        assert!(matches!(verify(&SECRET, "a.b.c"), Err(AuthError::SessionInvalid)));
    }
}
