use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use crewdeck_db::models::{Access, Client};
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
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub created_at: String,
}

fn to_response(client: Client) -> ClientResponse {
    ClientResponse {
        id: client.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: client.name,
        email: client.email,
        phone: client.phone,
        company_name: client.company_name,
        created_at: client
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    ctx.authorize(READERS)?;

    let clients = state.clients.list(ctx.company_id).await?;
    Ok(Json(clients.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    Payload(body): Payload<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), ApiError> {
    ctx.authorize(WRITERS)?;

    let client = state
        .clients
        .create(
            ctx.company_id,
            body.name,
            body.email,
            body.phone,
            body.company_name,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(to_response(client))))
}

pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(client_id): Path<String>,
    Payload(body): Payload<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, ApiError> {
    ctx.authorize(WRITERS)?;

    let cid = ObjectId::parse_str(&client_id)
        .map_err(|_| ApiError::BadRequest("Invalid client_id".to_string()))?;
    let client = state
        .clients
        .update(
            ctx.company_id,
            cid,
            body.name,
            body.email,
            body.phone,
            body.company_name,
        )
        .await?;
    Ok(Json(to_response(client)))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(client_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.authorize(WRITERS)?;

    let cid = ObjectId::parse_str(&client_id)
        .map_err(|_| ApiError::BadRequest("Invalid client_id".to_string()))?;
    state.clients.delete(ctx.company_id, cid).await?;
    Ok(StatusCode::NO_CONTENT)
}
