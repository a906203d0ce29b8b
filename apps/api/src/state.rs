use crate::config::Config;
use crate::draft::session::SessionRegistry;
use crate::resume_client::ResumeApiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    /// Backend client without credentials; handlers attach the caller's cookie.
    pub resume_api: ResumeApiClient,
    pub config: Config,
}
