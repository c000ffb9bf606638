use axum::{Json, extract::State, http::StatusCode};
use crewdeck_db::models::UserProfile;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::{ApiError, FieldIssue},
    extractors::{identity::Identity, payload::Payload, tenant::CurrentProfile},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub terms_accepted: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub display_name: Option<String>,
    #[validate(url)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub terms_accepted: bool,
    pub created_at: String,
}

fn to_response(profile: UserProfile) -> UserResponse {
    UserResponse {
        id: profile.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: profile.email,
        display_name: profile.display_name,
        photo_url: profile.photo_url,
        first_name: profile.first_name,
        last_name: profile.last_name,
        terms_accepted: profile.terms_accepted,
        created_at: profile
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}

/// First-time profile completion. The pipeline has already synced a
/// skeleton profile from the verified claims; this fills in names and
/// records terms acceptance. A profile that already accepted terms is
/// already provisioned.
pub async fn create(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Payload(body): Payload<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if !body.terms_accepted {
        return Err(ApiError::Validation(vec![FieldIssue {
            field: "terms_accepted".to_string(),
            message: "terms must be accepted".to_string(),
        }]));
    }

    let profile = state.profiles.find_or_create(&identity).await.map_err(|e| {
        tracing::error!(error = %e, subject = %identity.subject_id, "profile sync failed");
        ApiError::Internal("profile sync failed".to_string())
    })?;

    if profile.terms_accepted {
        return Err(ApiError::Conflict("user already provisioned".to_string()));
    }

    let profile_id = profile
        .id
        .ok_or_else(|| ApiError::Internal("profile sync failed".to_string()))?;

    let profile = state
        .profiles
        .complete(profile_id, body.first_name, body.last_name)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(profile))))
}

pub async fn me(current: CurrentProfile) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(to_response(current.profile)))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentProfile,
    Payload(body): Payload<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let profile_id = current
        .profile
        .id
        .ok_or_else(|| ApiError::Internal("profile sync failed".to_string()))?;

    let profile = state
        .profiles
        .update_profile(
            profile_id,
            body.first_name,
            body.last_name,
            body.display_name,
            body.photo_url,
        )
        .await?;

    Ok(Json(to_response(profile)))
}

/// Account deletion. The presenting credential is revoked so it cannot
/// resurrect the profile on a later request, and the user's membership
/// is unlinked back to a pending invite so their roster entry never
/// points at a dead profile.
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentProfile,
) -> Result<StatusCode, ApiError> {
    let profile_id = current
        .profile
        .id
        .ok_or_else(|| ApiError::Internal("profile sync failed".to_string()))?;

    state
        .revocations
        .revoke(
            &current.identity.credential_id,
            current.identity.expires_at,
        )
        .await?;
    state.members.unlink_user(profile_id).await?;
    state.profiles.delete(profile_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
