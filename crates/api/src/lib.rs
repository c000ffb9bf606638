pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Per-IP throttle on account provisioning only; everything else is
    // already gated by a verified credential.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(state.settings.rate_limit.per_second)
            .burst_size(state.settings.rate_limit.burst)
            .finish()
            .expect("invalid rate limit configuration"),
    );

    // Account routes (credential only, no tenant context)
    let user_routes = Router::new().route(
        "/user",
        post(routes::user::create)
            .layer(GovernorLayer {
                config: governor_conf,
            })
            .get(routes::user::me)
            .patch(routes::user::update)
            .delete(routes::user::delete),
    );

    // Tenant bootstrap
    let company_routes = Router::new()
        .route("/company", post(routes::company::create))
        .route("/company", get(routes::company::get));

    // Project routes
    let project_routes = Router::new()
        .route("/", get(routes::project::list).post(routes::project::create))
        .route(
            "/{project_id}",
            get(routes::project::get)
                .patch(routes::project::update)
                .delete(routes::project::delete),
        );

    // Task routes
    let task_routes = Router::new()
        .route(
            "/projects/{project_id}/tasks",
            get(routes::task::list_for_project).post(routes::task::create),
        )
        .route(
            "/task/{task_id}",
            get(routes::task::get)
                .patch(routes::task::update)
                .delete(routes::task::delete),
        )
        .route("/task-assignees/bulk", post(routes::task::bulk_assign));

    // Team member routes
    let member_routes = Router::new()
        .route(
            "/",
            get(routes::team_member::list).post(routes::team_member::invite),
        )
        .route(
            "/{member_id}",
            axum::routing::patch(routes::team_member::update)
                .delete(routes::team_member::delete),
        );

    // Client routes
    let client_routes = Router::new()
        .route("/", get(routes::client::list).post(routes::client::create))
        .route(
            "/{client_id}",
            axum::routing::patch(routes::client::update).delete(routes::client::delete),
        );

    // Comment routes
    let comment_routes = Router::new()
        .route(
            "/",
            get(routes::comment::list).post(routes::comment::create),
        )
        .route(
            "/{comment_id}",
            axum::routing::patch(routes::comment::update).delete(routes::comment::delete),
        );

    // Note routes
    let note_routes = Router::new()
        .route("/", get(routes::note::list).post(routes::note::create))
        .route(
            "/{note_id}",
            axum::routing::patch(routes::note::update).delete(routes::note::delete),
        );

    // Asset routes
    let asset_routes = Router::new()
        .route("/", get(routes::asset::list).post(routes::asset::create))
        .route(
            "/{asset_id}",
            axum::routing::patch(routes::asset::rename).delete(routes::asset::delete),
        );

    // Compose API
    let api = Router::new()
        .merge(user_routes)
        .merge(company_routes)
        .merge(task_routes)
        .nest("/project", project_routes)
        .nest("/team-members", member_routes)
        .nest("/clients", client_routes)
        .nest("/comments", comment_routes)
        .nest("/notes", note_routes)
        .nest("/assets", asset_routes);

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "service": "crewdeck-api",
    }))
}
