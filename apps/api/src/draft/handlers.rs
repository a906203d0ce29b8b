//! Axum route handlers for resume editing sessions.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::draft::lifecycle::{AuthProvider, SaveMode, SubmitOutcome};
use crate::draft::payload::build_payload;
use crate::draft::reconcile::{DraftSource, DraftSources};
use crate::draft::seed::SeedQuery;
use crate::draft::session::EditingSession;
use crate::errors::AppError;
use crate::models::resume::{ResumeDraft, ResumePayload, StoredResume};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OpenSessionRequest {
    /// Id of the resume being edited; absent when creating.
    pub document_id: Option<String>,
    /// The stored resume, pre-fetched by the caller when editing.
    pub resume_data: Option<StoredResume>,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub space_id: String,
    pub document_id: Option<String>,
    pub edit_mode: bool,
    pub source: Option<DraftSource>,
    pub opened_at: DateTime<Utc>,
    pub is_saving: bool,
    pub draft: ResumeDraft,
}

#[derive(Debug, Deserialize)]
pub struct AddTechRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AddTechResponse {
    pub added: bool,
    pub tech_stack: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub mode: SaveMode,
    pub redirect_to: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub redirect_to: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Authorization
// ────────────────────────────────────────────────────────────────────────────

/// Per-request auth derived from the caller's cookies. Callers without the
/// session cookie are guests.
pub struct RequestAuth {
    cookie: Option<String>,
    logged_in: bool,
}

impl RequestAuth {
    pub fn from_headers(headers: &HeaderMap, session_cookie: &str) -> Self {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let logged_in = cookie
            .as_deref()
            .is_some_and(|c| has_cookie(c, session_cookie));
        Self { cookie, logged_in }
    }

    pub fn cookie(&self) -> Option<String> {
        self.cookie.clone()
    }
}

impl AuthProvider for RequestAuth {
    fn is_guest(&self) -> bool {
        !self.logged_in
    }

    fn request_login(&self) {
        info!("Guest caller asked to log in before saving");
    }
}

fn has_cookie(header: &str, name: &str) -> bool {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(k, v)| k == name && !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

async fn find_session(
    state: &AppState,
    id: Uuid,
) -> Result<std::sync::Arc<EditingSession>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Editing session {id} not found")))
}

async fn session_view(session: &EditingSession) -> SessionView {
    let state = session.state.lock().await;
    SessionView {
        session_id: session.id,
        space_id: session.target.space_id.clone(),
        document_id: session.target.document_id.clone(),
        edit_mode: session.is_edit_mode(),
        source: state.source(),
        opened_at: session.opened_at,
        is_saving: session.lifecycle.is_saving(),
        draft: state.draft.clone(),
    }
}

/// POST /api/v1/spaces/:space_id/resume/sessions?data=&portfolios=&careers=
///
/// Opens an editing session and initializes its draft from the winning source.
/// The JSON body is only needed when editing; it may be omitted otherwise.
pub async fn handle_open_session(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
    Query(seed): Query<SeedQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    if space_id.trim().is_empty() {
        return Err(AppError::Validation("space_id cannot be empty".to_string()));
    }

    let request: OpenSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        OpenSessionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid session request body: {e}")))?
    };

    let sources = DraftSources {
        document_id: request.document_id.filter(|id| !id.trim().is_empty()),
        stored: request.resume_data,
        seed,
    };
    let (session, _) = EditingSession::open(space_id, &sources);
    let session = state.sessions.insert(session).await;

    Ok((StatusCode::CREATED, Json(session_view(&session).await)))
}

/// GET /api/v1/resume/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(session_view(&session).await))
}

/// PUT /api/v1/resume/sessions/:id/draft
///
/// Form sections write the whole draft back. Reconciliation never re-runs.
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ResumeDraft>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    session.state.lock().await.draft = draft;
    Ok(Json(session_view(&session).await))
}

/// POST /api/v1/resume/sessions/:id/tech-stack
pub async fn handle_add_tech(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddTechRequest>,
) -> Result<Json<AddTechResponse>, AppError> {
    if request.token.trim().is_empty() {
        return Err(AppError::Validation("token cannot be empty".to_string()));
    }

    let session = find_session(&state, id).await?;
    let mut draft_state = session.state.lock().await;
    let added = draft_state.draft.add_tech(&request.token);
    Ok(Json(AddTechResponse {
        added,
        tech_stack: draft_state.draft.tech_stack.iter().cloned().collect(),
    }))
}

/// GET /api/v1/resume/sessions/:id/payload
///
/// The exact body a submit would send, without sending it.
pub async fn handle_preview_payload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumePayload>, AppError> {
    let session = find_session(&state, id).await?;
    let draft = session.snapshot().await;
    Ok(Json(build_payload(&draft)))
}

/// POST /api/v1/resume/sessions/:id/submit
///
/// On success the session is closed and the caller is sent back to the list.
/// Guests get 401, a concurrent submit gets 409, a backend failure gets 502;
/// in all three cases the draft stays editable.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<SubmitResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let auth = RequestAuth::from_headers(&headers, &state.config.session_cookie);
    let store = state.resume_api.with_cookie(auth.cookie());
    let draft = session.snapshot().await;

    match session
        .lifecycle
        .submit(&auth, &store, &session.target, &draft)
        .await?
    {
        SubmitOutcome::Saved { mode, redirect_to } => {
            state.sessions.close(id).await;
            Ok(Json(SubmitResponse { mode, redirect_to }))
        }
        SubmitOutcome::LoginRequired => Err(AppError::LoginRequired),
    }
}

/// DELETE /api/v1/resume/sessions/:id
///
/// Cancels editing; the draft is discarded.
pub async fn handle_cancel_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelResponse>, AppError> {
    let session = state
        .sessions
        .close(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Editing session {id} not found")))?;
    Ok(Json(CancelResponse {
        redirect_to: session.target.list_path(),
    }))
}
