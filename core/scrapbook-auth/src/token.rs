//! Session token parsing and Ed25519 signature verification.
//!
//! The signature covers `payload_b64.as_bytes()` (the base64url-encoded
//! payload string, not the decoded JSON), matching the issuer.

use crate::error::{AuthError, AuthResult};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use scrapbook_types::UserId;
use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID.
    pub sub: UserId,
    /// User email.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch); absent means no expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Decodes a base64url (unpadded) Ed25519 public key.
pub fn decode_public_key(encoded: &str) -> AuthResult<VerifyingKey> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|e| AuthError::InvalidKey(format!("invalid base64: {e}")))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| AuthError::InvalidKey(format!("expected 32 bytes, got {}", b.len())))?;
    VerifyingKey::from_bytes(&bytes).map_err(|_| AuthError::InvalidKey("not a valid Ed25519 point".into()))
}

/// Verifies the signature of `token` and decodes its claims.
///
/// Time-based checks (`exp`, `iat`) are left to the caller.
pub fn parse_token(token: &str, key: &VerifyingKey) -> AuthResult<SessionClaims> {
    let token = token.trim();

    let Some((payload_b64, signature_b64)) = token.split_once('.') else {
        return Err(AuthError::InvalidFormat(
            "token must have exactly two parts separated by a dot".to_string(),
        ));
    };
    if signature_b64.contains('.') {
        return Err(AuthError::InvalidFormat(
            "token must have exactly two parts separated by a dot".to_string(),
        ));
    }

    let sig_bytes = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| AuthError::InvalidFormat(format!("invalid signature base64: {e}")))?;
    let signature = Signature::from_slice(&sig_bytes)
        .map_err(|_| AuthError::InvalidFormat("invalid signature length".to_string()))?;

    key.verify(payload_b64.as_bytes(), &signature)
        .map_err(|_| AuthError::InvalidSignature)?;

    let payload_json = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|e| AuthError::InvalidFormat(format!("invalid payload base64: {e}")))?;

    serde_json::from_slice(&payload_json)
        .map_err(|e| AuthError::InvalidPayload(format!("invalid payload JSON: {e}")))
}
