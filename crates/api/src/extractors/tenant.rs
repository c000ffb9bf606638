use axum::{extract::FromRequestParts, http::request::Parts};
use bson::oid::ObjectId;
use crewdeck_db::models::{Access, UserProfile};
use crewdeck_services::identity::VerifiedIdentity;

use crate::{
    error::ApiError,
    extractors::identity::{FromRef, Identity},
    state::AppState,
};

/// Pipeline stage 2: the verified identity plus its local profile.
///
/// The profile is found-or-created on every request (idempotent under
/// the unique subject_id index); a persistence failure here stops the
/// request before any downstream stage runs.
#[derive(Debug, Clone)]
pub struct CurrentProfile {
    pub identity: VerifiedIdentity,
    pub profile: UserProfile,
}

impl<S> FromRequestParts<S> for CurrentProfile
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Identity(identity) = Identity::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let profile = app_state
            .profiles
            .find_or_create(&identity)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, subject = %identity.subject_id, "profile sync failed");
                ApiError::Internal("profile sync failed".to_string())
            })?;

        Ok(CurrentProfile { identity, profile })
    }
}

/// Pipeline stage 3: the immutable tenant-scoped identity.
///
/// Constructed once per request by composing verification, profile
/// resolution and membership resolution; handlers receive it as a
/// value, never as mutable request state. A handler that takes a
/// TenantContext cannot run before all three stages succeed.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub user_id: ObjectId,
    pub company_id: ObjectId,
    pub team_member_id: ObjectId,
    pub access: Access,
    pub role: String,
}

impl TenantContext {
    /// Role gate: pure set-membership check, re-evaluated per request
    /// and never cached, since roles can change between calls.
    pub fn authorize(&self, allowed: &[Access]) -> Result<(), ApiError> {
        if allowed.contains(&self.access) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "access level not permitted for this operation".to_string(),
            ))
        }
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentProfile { profile, .. } =
            CurrentProfile::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let user_id = profile
            .id
            .ok_or_else(|| ApiError::Internal("profile sync failed".to_string()))?;

        let member = app_state
            .members
            .find_for_user(user_id)
            .await?
            .ok_or_else(|| {
                ApiError::Forbidden("user not provisioned for any tenant".to_string())
            })?;

        let team_member_id = member
            .id
            .ok_or_else(|| ApiError::Internal("membership missing id".to_string()))?;

        // Fire-and-forget bookkeeping; never blocks or fails the request.
        let members = app_state.members.clone();
        tokio::spawn(async move {
            let _ = members.touch_last_login(team_member_id).await;
        });

        Ok(TenantContext {
            user_id,
            company_id: member.company_id,
            team_member_id,
            access: member.access,
            role: member.role,
        })
    }
}
