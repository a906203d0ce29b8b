pub mod health;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::draft::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/spaces/:space_id/resume/sessions",
            post(handlers::handle_open_session),
        )
        .route(
            "/api/v1/resume/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_cancel_session),
        )
        .route(
            "/api/v1/resume/sessions/:id/draft",
            put(handlers::handle_update_draft),
        )
        .route(
            "/api/v1/resume/sessions/:id/tech-stack",
            post(handlers::handle_add_tech),
        )
        .route(
            "/api/v1/resume/sessions/:id/payload",
            get(handlers::handle_preview_payload),
        )
        .route(
            "/api/v1/resume/sessions/:id/submit",
            post(handlers::handle_submit),
        )
        .with_state(state)
}

/// CORS for the editor front end. Credentials are allowed so the session
/// cookie reaches the login check and the resume backend.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'")))
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}
