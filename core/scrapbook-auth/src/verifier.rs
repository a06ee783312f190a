use crate::error::{AuthError, AuthResult};
use crate::token::{decode_public_key, parse_token};
use ed25519_dalek::VerifyingKey;
use scrapbook_types::UserId;
use serde::{Deserialize, Serialize};

/// Clock skew tolerated on `exp` and `iat`, in seconds.
pub const DEFAULT_LEEWAY_SECS: i64 = 60;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

/// Turns a bearer credential into an identity.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> AuthResult<Identity>;
}

/// Verifies Ed25519-signed session tokens against a single public key.
#[derive(Debug, Clone)]
pub struct SignedTokenVerifier {
    key: VerifyingKey,
    leeway_secs: i64,
}

impl SignedTokenVerifier {
    pub fn new(key: VerifyingKey) -> Self {
        Self {
            key,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }

    /// Builds a verifier from a base64url-encoded public key.
    pub fn from_base64(encoded: &str) -> AuthResult<Self> {
        decode_public_key(encoded).map(Self::new)
    }

    #[must_use]
    pub fn with_leeway(mut self, leeway_secs: i64) -> Self {
        self.leeway_secs = leeway_secs.max(0);
        self
    }

    /// Verifies `credential` as of `now` (seconds since epoch).
    pub fn verify_at(&self, credential: &str, now: i64) -> AuthResult<Identity> {
        let claims = parse_token(credential, &self.key)?;
        if let Some(exp) = claims.exp {
            if now > exp.saturating_add(self.leeway_secs) {
                return Err(AuthError::Expired { expired_at: exp });
            }
        }
        if claims.iat > now.saturating_add(self.leeway_secs) {
            return Err(AuthError::NotYetValid { issued_at: claims.iat });
        }
        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

impl IdentityVerifier for SignedTokenVerifier {
    fn verify(&self, credential: &str) -> AuthResult<Identity> {
        self.verify_at(credential, chrono::Utc::now().timestamp())
    }
}

/// Extracts the credential from an `Authorization: Bearer <token>` header value.
pub fn parse_authorization_header(header: Option<&str>) -> AuthResult<&str> {
    let header = header.ok_or(AuthError::MissingCredential)?.trim();
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MissingCredential)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingCredential);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}
