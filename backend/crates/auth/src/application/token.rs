//! Session Token
//!
//! `<session uuid>.<base64url(HMAC-SHA256(secret, uuid))>`. The signature
//! lets the server reject forged ids without a database round trip.

use platform::crypto;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

pub fn sign_session_token(secret: &[u8], session_id: Uuid) -> String {
    let id = session_id.to_string();
    let signature = crypto::hmac_sha256(secret, id.as_bytes());
    format!("{}.{}", id, crypto::to_base64_url(&signature))
}

/// Verify the signature and return the session id
pub fn parse_session_token(secret: &[u8], token: &str) -> AuthResult<Uuid> {
    let (id, signature_b64) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let signature = crypto::from_base64_url(signature_b64).map_err(|_| AuthError::SessionInvalid)?;
    if !crypto::verify_hmac_sha256(secret, id.as_bytes(), &signature) {
        return Err(AuthError::SessionInvalid);
    }

    id.parse().map_err(|_| AuthError::SessionInvalid)
}
