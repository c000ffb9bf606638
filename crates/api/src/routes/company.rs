use axum::{Json, extract::State, http::StatusCode};
use crewdeck_db::models::{Access, Company};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::{payload::Payload, tenant::CurrentProfile, tenant::TenantContext},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub owner_profile_id: String,
    pub created_at: String,
}

fn to_response(company: Company) -> CompanyResponse {
    CompanyResponse {
        id: company.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: company.name,
        owner_profile_id: company.owner_profile_id.to_hex(),
        created_at: company
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    }
}

/// Create the tenant and bootstrap the creator's superAdmin
/// membership. Requires a synced profile but no existing membership.
pub async fn create(
    State(state): State<AppState>,
    current: CurrentProfile,
    Payload(body): Payload<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    let company = state.companies.create(body.name, &current.profile).await?;
    Ok((StatusCode::CREATED, Json(to_response(company))))
}

pub async fn get(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<CompanyResponse>, ApiError> {
    ctx.authorize(&[Access::SuperAdmin])?;

    let company = state.companies.find(ctx.company_id).await?;
    Ok(Json(to_response(company)))
}
