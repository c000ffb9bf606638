use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use crewdeck_db::models::{Access, Asset};
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
pub struct CreateAssetRequest {
    #[validate(length(min = 1, max = 300))]
    pub name: String,
    #[validate(url)]
    pub url: String,
    pub project_id: Option<String>,
    #[validate(length(max = 100))]
    pub mime_type: Option<String>,
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RenameAssetRequest {
    #[validate(length(min = 1, max = 300))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AssetListQuery {
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub id: String,
    pub project_id: Option<String>,
    pub name: String,
    pub url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<u64>,
    pub uploaded_by: String,
    pub created_at: String,
}

fn to_response(asset: Asset) -> AssetResponse {
    AssetResponse {
        id: asset.id.map(|id| id.to_hex()).unwrap_or_default(),
        project_id: asset.project_id.map(|id| id.to_hex()),
        name: asset.name,
        url: asset.url,
        mime_type: asset.mime_type,
        size_bytes: asset.size_bytes,
        uploaded_by: asset.uploaded_by.to_hex(),
        created_at: asset.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
    Query(query): Query<AssetListQuery>,
) -> Result<Json<Vec<AssetResponse>>, ApiError> {
    ctx.authorize(READERS)?;

    let project_id = query
        .project_id
        .as_deref()
        .map(|id| {
            ObjectId::parse_str(id)
                .map_err(|_| ApiError::BadRequest("Invalid project_id".to_string()))
        })
        .transpose()?;

    let assets = state.assets.list(ctx.company_id, project_id).await?;
    Ok(Json(assets.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    Payload(body): Payload<CreateAssetRequest>,
) -> Result<(StatusCode, Json<AssetResponse>), ApiError> {
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

    let asset = state
        .assets
        .create(
            ctx.company_id,
            project_id,
            ctx.team_member_id,
            body.name,
            body.url,
            body.mime_type,
            body.size_bytes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(asset))))
}

pub async fn rename(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(asset_id): Path<String>,
    Payload(body): Payload<RenameAssetRequest>,
) -> Result<Json<AssetResponse>, ApiError> {
    ctx.authorize(WRITERS)?;

    let aid = ObjectId::parse_str(&asset_id)
        .map_err(|_| ApiError::BadRequest("Invalid asset_id".to_string()))?;
    let asset = state.assets.rename(ctx.company_id, aid, body.name).await?;
    Ok(Json(to_response(asset)))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(asset_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.authorize(WRITERS)?;

    let aid = ObjectId::parse_str(&asset_id)
        .map_err(|_| ApiError::BadRequest("Invalid asset_id".to_string()))?;
    state.assets.delete(ctx.company_id, aid).await?;
    Ok(StatusCode::NO_CONTENT)
}
