use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use crewdeck_db::models::{Access, Project, ProjectStatus};
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
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: String,
}

fn to_response(project: Project) -> ProjectResponse {
    ProjectResponse {
        id: project.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: project.name,
        description: project.description,
        status: project.status,
        created_at: project
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    ctx.authorize(READERS)?;

    let projects = state.projects.list(ctx.company_id).await?;
    Ok(Json(projects.into_iter().map(to_response).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectResponse>, ApiError> {
    ctx.authorize(READERS)?;

    let pid = ObjectId::parse_str(&project_id)
        .map_err(|_| ApiError::BadRequest("Invalid project_id".to_string()))?;

    let project = state
        .projects
        .base
        .find_by_id_in_company(ctx.company_id, pid)
        .await?;
    Ok(Json(to_response(project)))
}

pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    Payload(body): Payload<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    ctx.authorize(WRITERS)?;

    let project = state
        .projects
        .create(
            ctx.company_id,
            body.name,
            body.description,
            body.status.unwrap_or_default(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(project))))
}

pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(project_id): Path<String>,
    Payload(body): Payload<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    ctx.authorize(WRITERS)?;

    let pid = ObjectId::parse_str(&project_id)
        .map_err(|_| ApiError::BadRequest("Invalid project_id".to_string()))?;

    let project = state
        .projects
        .update(ctx.company_id, pid, body.name, body.description, body.status)
        .await?;
    Ok(Json(to_response(project)))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(project_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.authorize(WRITERS)?;

    let pid = ObjectId::parse_str(&project_id)
        .map_err(|_| ApiError::BadRequest("Invalid project_id".to_string()))?;

    state.projects.delete(ctx.company_id, pid).await?;
    Ok(StatusCode::NO_CONTENT)
}
