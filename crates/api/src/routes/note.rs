use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use crewdeck_db::models::{Access, Note};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::{payload::Payload, tenant::TenantContext},
    state::AppState,
};

const READERS: &[Access] = &[Access::Admin, Access::SuperAdmin, Access::TeamMember];
const WRITERS: &[Access] = &[Access::Admin, Access::SuperAdmin, Access::TeamMember];

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 20000))]
    pub content: String,
    pub project_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateNoteRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(max = 20000))]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: String,
    pub project_id: Option<String>,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

fn to_response(note: Note) -> NoteResponse {
    NoteResponse {
        id: note.id.map(|id| id.to_hex()).unwrap_or_default(),
        project_id: note.project_id.map(|id| id.to_hex()),
        title: note.title,
        content: note.content,
        created_at: note.created_at.try_to_rfc3339_string().unwrap_or_default(),
        updated_at: note.updated_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    ctx.authorize(READERS)?;

    let notes = state.notes.list(ctx.company_id).await?;
    Ok(Json(notes.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    Payload(body): Payload<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    ctx.authorize(WRITERS)?;

    let project_id = body
        .project_id
        .as_deref()
        .map(|id| {
            ObjectId::parse_str(id)
                .map_err(|_| ApiError::BadRequest("Invalid project_id".to_string()))
        })
        .transpose()?;

    if let Some(pid) = project_id {
        state
            .projects
            .base
            .find_by_id_in_company(ctx.company_id, pid)
            .await?;
    }

    let note = state
        .notes
        .create(ctx.company_id, project_id, body.title, body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(note))))
}

pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(note_id): Path<String>,
    Payload(body): Payload<UpdateNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    ctx.authorize(WRITERS)?;

    let nid = ObjectId::parse_str(&note_id)
        .map_err(|_| ApiError::BadRequest("Invalid note_id".to_string()))?;
    let note = state
        .notes
        .update(ctx.company_id, nid, body.title, body.content)
        .await?;
    Ok(Json(to_response(note)))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(note_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.authorize(WRITERS)?;

    let nid = ObjectId::parse_str(&note_id)
        .map_err(|_| ApiError::BadRequest("Invalid note_id".to_string()))?;
    state.notes.delete(ctx.company_id, nid).await?;
    Ok(StatusCode::NO_CONTENT)
}
