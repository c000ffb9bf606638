use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use crewdeck_db::models::{Access, MemberStatus, TeamMember};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::{payload::Payload, tenant::TenantContext},
    state::AppState,
};

const READERS: &[Access] = &[Access::Admin, Access::SuperAdmin, Access::TeamMember];
const WRITERS: &[Access] = &[Access::Admin, Access::SuperAdmin];

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InviteMemberRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub role: String,
    pub access: Access,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, max = 100))]
    pub role: Option<String>,
    pub access: Option<Access>,
    pub status: Option<MemberStatus>,
}

#[derive(Debug, Serialize)]
pub struct TeamMemberResponse {
    pub id: String,
    pub user_id: Option<String>,
    pub email: String,
    pub role: String,
    pub access: Access,
    pub status: MemberStatus,
    pub last_login: Option<String>,
    pub created_at: String,
}

fn to_response(member: TeamMember) -> TeamMemberResponse {
    TeamMemberResponse {
        id: member.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_id: member.user_id.map(|id| id.to_hex()),
        email: member.email,
        role: member.role,
        access: member.access,
        status: member.status,
        last_login: member
            .last_login
            .map(|d| d.try_to_rfc3339_string().unwrap_or_default()),
        created_at: member
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Vec<TeamMemberResponse>>, ApiError> {
    ctx.authorize(READERS)?;

    let members = state.members.list(ctx.company_id).await?;
    Ok(Json(members.into_iter().map(to_response).collect()))
}

pub async fn invite(
    State(state): State<AppState>,
    ctx: TenantContext,
    Payload(body): Payload<InviteMemberRequest>,
) -> Result<(StatusCode, Json<TeamMemberResponse>), ApiError> {
    ctx.authorize(WRITERS)?;

    let member = state
        .members
        .invite(ctx.company_id, body.email, body.role, body.access)
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(member))))
}

pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(member_id): Path<String>,
    Payload(body): Payload<UpdateMemberRequest>,
) -> Result<Json<TeamMemberResponse>, ApiError> {
    ctx.authorize(WRITERS)?;

    let mid = ObjectId::parse_str(&member_id)
        .map_err(|_| ApiError::BadRequest("Invalid member_id".to_string()))?;
    let member = state
        .members
        .update(ctx.company_id, mid, body.role, body.access, body.status)
        .await?;
    Ok(Json(to_response(member)))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(member_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.authorize(WRITERS)?;

    let mid = ObjectId::parse_str(&member_id)
        .map_err(|_| ApiError::BadRequest("Invalid member_id".to_string()))?;

    // Removing yourself would orphan the request's own tenant context.
    if mid == ctx.team_member_id {
        return Err(ApiError::BadRequest(
            "cannot remove your own membership".to_string(),
        ));
    }

    state.members.delete(ctx.company_id, mid).await?;
    Ok(StatusCode::NO_CONTENT)
}
