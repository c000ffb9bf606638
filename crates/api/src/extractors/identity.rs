use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use crewdeck_services::identity::VerifiedIdentity;

use crate::{error::ApiError, state::AppState};

/// Pipeline stage 1: a verified bearer credential.
///
/// Verification is re-run on every request; nothing is cached across
/// requests. A credential on the revocation list fails exactly like an
/// expired one.
#[derive(Debug, Clone)]
pub struct Identity(pub VerifiedIdentity);

impl<S> FromRequestParts<S> for Identity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing credential".to_string()))?;

        let identity = app_state.identity.verify_bearer(header_value)?;

        if app_state
            .revocations
            .is_revoked(&identity.credential_id)
            .await?
        {
            return Err(ApiError::Unauthorized(
                "invalid or expired credential".to_string(),
            ));
        }

        Ok(Identity(identity))
    }
}

/// Helper trait for extracting AppState from composite state types
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AppState> for AppState {
    fn from_ref(input: &AppState) -> Self {
        input.clone()
    }
}
