//! Bearer-token authentication extractor.

use crate::AppState;
use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use scrapbook_auth::{AuthError, Identity, parse_authorization_header};

/// The verified caller of a request.
///
/// Handlers that take this extractor reject unauthenticated requests with
/// 401 before any store is touched.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str())
            .transpose()
            .map_err(|_| AuthError::InvalidFormat("authorization header is not ASCII".into()))?;
        let token = parse_authorization_header(header)?;
        let identity = state.verifier.verify(token)?;
        tracing::debug!(user = %identity.user_id, "authenticated");
        Ok(Self(identity))
    }
}
