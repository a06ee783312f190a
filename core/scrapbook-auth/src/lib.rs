//! Identity verification for the scrapbook service.
//!
//! Every request carries an opaque bearer credential. This crate turns it
//! into an [`Identity`] (stable user id + email) or fails with an
//! [`AuthError`], which always maps to `Unauthenticated`.
//!
//! Credential issuance is handled elsewhere; this crate only verifies.
//!
//! # Token Format
//!
//! Tokens are formatted as: `base64url(payload).base64url(signature)`
//! The payload is a JSON object signed with Ed25519, containing:
//! - `sub` (user UUID), `email`, `iat`, and optionally `exp` (seconds)

mod error;
mod token;
mod verifier;

pub use error::{AuthError, AuthResult};
pub use token::{SessionClaims, decode_public_key, parse_token};
pub use verifier::{
    DEFAULT_LEEWAY_SECS, Identity, IdentityVerifier, SignedTokenVerifier,
    parse_authorization_header,
};
