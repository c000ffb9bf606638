use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use crewdeck_db::models::{Access, Comment};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::{payload::Payload, tenant::TenantContext},
    state::AppState,
};

const READERS: &[Access] = &[Access::Admin, Access::SuperAdmin, Access::TeamMember];
// Any member may comment; authorship is always the caller's own
// membership.
const WRITERS: &[Access] = &[Access::Admin, Access::SuperAdmin, Access::TeamMember];

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub task_id: String,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    pub task_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub task_id: String,
    pub author_member_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

fn to_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id.map(|id| id.to_hex()).unwrap_or_default(),
        task_id: comment.task_id.to_hex(),
        author_member_id: comment.author_member_id.to_hex(),
        content: comment.content,
        created_at: comment
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
        updated_at: comment
            .updated_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    ctx.authorize(READERS)?;

    let task_id = query
        .task_id
        .as_deref()
        .map(|id| {
            ObjectId::parse_str(id)
                .map_err(|_| ApiError::BadRequest("Invalid task_id".to_string()))
        })
        .transpose()?;

    let comments = state.comments.list(ctx.company_id, task_id).await?;
    Ok(Json(comments.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    Payload(body): Payload<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    ctx.authorize(WRITERS)?;

    let tid = ObjectId::parse_str(&body.task_id)
        .map_err(|_| ApiError::BadRequest("Invalid task_id".to_string()))?;

    // The task must belong to this tenant.
    state
        .tasks
        .base
        .find_by_id_in_company(ctx.company_id, tid)
        .await?;

    let comment = state
        .comments
        .create(ctx.company_id, tid, ctx.team_member_id, body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(comment))))
}

pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(comment_id): Path<String>,
    Payload(body): Payload<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    ctx.authorize(WRITERS)?;

    let cid = ObjectId::parse_str(&comment_id)
        .map_err(|_| ApiError::BadRequest("Invalid comment_id".to_string()))?;

    let existing = state
        .comments
        .base
        .find_by_id_in_company(ctx.company_id, cid)
        .await?;

    // Only the author or an admin may edit.
    if existing.author_member_id != ctx.team_member_id {
        ctx.authorize(&[Access::Admin, Access::SuperAdmin])?;
    }

    let comment = state
        .comments
        .update_content(ctx.company_id, cid, body.content)
        .await?;
    Ok(Json(to_response(comment)))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.authorize(WRITERS)?;

    let cid = ObjectId::parse_str(&comment_id)
        .map_err(|_| ApiError::BadRequest("Invalid comment_id".to_string()))?;

    let existing = state
        .comments
        .base
        .find_by_id_in_company(ctx.company_id, cid)
        .await?;
    if existing.author_member_id != ctx.team_member_id {
        ctx.authorize(&[Access::Admin, Access::SuperAdmin])?;
    }

    state.comments.delete(ctx.company_id, cid).await?;
    Ok(StatusCode::NO_CONTENT)
}
