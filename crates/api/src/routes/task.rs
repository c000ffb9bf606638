use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use crewdeck_db::models::{Access, MemberStatus, TaskPriority, TaskStatus};
use crewdeck_services::dao::task::{EnrichedTask, NewTask, TaskAssignee, TaskChanges};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::{payload::Payload, tenant::TenantContext},
    state::AppState,
};

const READERS: &[Access] = &[Access::Admin, Access::SuperAdmin, Access::TeamMember];
const WRITERS: &[Access] = &[Access::Admin, Access::SuperAdmin];
// Team members may update tasks (e.g. progress), but not create or
// delete them.
const UPDATERS: &[Access] = &[Access::Admin, Access::SuperAdmin, Access::TeamMember];

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[validate(range(max = 100))]
    pub progress: Option<u32>,
    pub due_date: Option<String>,
    pub team_member_ids: Option<Vec<String>>,
}

/// `team_member_ids` is deliberately tri-state: omitted leaves the
/// assignment set untouched, present (even empty) replaces it.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[validate(range(max = 100))]
    pub progress: Option<u32>,
    pub due_date: Option<String>,
    pub team_member_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BulkAssignRequest {
    pub task_id: String,
    pub team_member_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AssigneeResponse {
    pub id: String,
    pub email: String,
    pub role: String,
    pub status: MemberStatus,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub progress: u32,
    pub due_date: Option<String>,
    pub assignees: Vec<AssigneeResponse>,
    pub created_at: String,
    pub updated_at: String,
}

fn to_assignee_response(assignee: TaskAssignee) -> AssigneeResponse {
    AssigneeResponse {
        id: assignee.id.to_hex(),
        email: assignee.email,
        role: assignee.role,
        status: assignee.status,
        first_name: assignee.first_name,
        last_name: assignee.last_name,
        avatar: assignee.avatar,
    }
}

fn to_response(enriched: EnrichedTask) -> TaskResponse {
    let task = enriched.task;
    TaskResponse {
        id: task.id.map(|id| id.to_hex()).unwrap_or_default(),
        project_id: task.project_id.to_hex(),
        title: task.title,
        description: task.description,
        status: task.status,
        priority: task.priority,
        progress: task.progress,
        due_date: task
            .due_date
            .map(|d| d.try_to_rfc3339_string().unwrap_or_default()),
        assignees: enriched
            .assignees
            .into_iter()
            .map(to_assignee_response)
            .collect(),
        created_at: task.created_at.try_to_rfc3339_string().unwrap_or_default(),
        updated_at: task.updated_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

fn parse_object_id(value: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid {what}")))
}

fn parse_member_ids(ids: &[String]) -> Result<Vec<ObjectId>, ApiError> {
    ids.iter()
        .map(|id| parse_object_id(id, "team_member_id"))
        .collect()
}

fn parse_due_date(value: &str) -> Result<bson::DateTime, ApiError> {
    let parsed = chrono::DateTime::parse_from_rfc3339(value)
        .map_err(|_| ApiError::BadRequest("Invalid due_date".to_string()))?;
    Ok(bson::DateTime::from_chrono(parsed.with_timezone(&chrono::Utc)))
}

pub async fn list_for_project(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    ctx.authorize(READERS)?;

    let pid = parse_object_id(&project_id, "project_id")?;
    let tasks = state.tasks.find_enriched(ctx.company_id, pid).await?;
    Ok(Json(tasks.into_iter().map(to_response).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    ctx.authorize(READERS)?;

    let tid = parse_object_id(&task_id, "task_id")?;
    let task = state.tasks.find_enriched_by_id(ctx.company_id, tid).await?;
    Ok(Json(to_response(task)))
}

pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(project_id): Path<String>,
    Payload(body): Payload<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    ctx.authorize(WRITERS)?;

    let pid = parse_object_id(&project_id, "project_id")?;

    // The project must exist in this tenant before a task lands in it.
    state
        .projects
        .base
        .find_by_id_in_company(ctx.company_id, pid)
        .await?;

    let team_member_ids = match &body.team_member_ids {
        Some(ids) => parse_member_ids(ids)?,
        None => Vec::new(),
    };
    let due_date = body.due_date.as_deref().map(parse_due_date).transpose()?;

    let input = NewTask {
        title: body.title,
        description: body.description,
        status: body.status.unwrap_or_default(),
        priority: body.priority.unwrap_or_default(),
        progress: body.progress.unwrap_or(0),
        due_date,
    };

    let task = state
        .tasks
        .create_with_assignees(ctx.company_id, pid, input, team_member_ids)
        .await?;

    let task_id = task
        .id
        .ok_or_else(|| ApiError::Internal("task missing id".to_string()))?;
    let enriched = state
        .tasks
        .find_enriched_by_id(ctx.company_id, task_id)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(enriched))))
}

pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(task_id): Path<String>,
    Payload(body): Payload<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    ctx.authorize(UPDATERS)?;

    let tid = parse_object_id(&task_id, "task_id")?;

    let team_member_ids = body
        .team_member_ids
        .as_deref()
        .map(parse_member_ids)
        .transpose()?;
    let due_date = body.due_date.as_deref().map(parse_due_date).transpose()?;

    let changes = TaskChanges {
        title: body.title,
        description: body.description,
        status: body.status,
        priority: body.priority,
        progress: body.progress,
        due_date,
        team_member_ids,
    };

    state.tasks.update(ctx.company_id, tid, changes).await?;

    let enriched = state.tasks.find_enriched_by_id(ctx.company_id, tid).await?;
    Ok(Json(to_response(enriched)))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.authorize(WRITERS)?;

    let tid = parse_object_id(&task_id, "task_id")?;
    state.tasks.delete(ctx.company_id, tid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_assign(
    State(state): State<AppState>,
    ctx: TenantContext,
    Payload(body): Payload<BulkAssignRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    ctx.authorize(WRITERS)?;

    let tid = parse_object_id(&body.task_id, "task_id")?;
    let member_ids = parse_member_ids(&body.team_member_ids)?;

    state
        .tasks
        .replace_assignees(ctx.company_id, tid, &member_ids)
        .await?;

    let enriched = state.tasks.find_enriched_by_id(ctx.company_id, tid).await?;
    Ok(Json(to_response(enriched)))
}
