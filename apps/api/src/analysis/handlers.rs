//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::export::export_text;
use crate::analysis::orchestrator::{
    analyze_and_save, ensure_company_intel, set_skill_confidence, AnalysisRequest,
};
use crate::analysis::scoring::{all_skills, weak_skills};
use crate::errors::AppError;
use crate::history::store::{HistoryListing, HistoryStore};
use crate::models::entry::{Confidence, Entry};
use crate::state::AppState;

const WEAK_SKILL_LIMIT: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SkillConfidenceRequest {
    pub skill: String,
    pub confidence: String,
}

/// Entry plus the skills still worth practicing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetailResponse {
    #[serde(flatten)]
    pub entry: Entry,
    pub weak_skills: Vec<String>,
}

impl From<Entry> for EntryDetailResponse {
    fn from(entry: Entry) -> Self {
        let skills = all_skills(&entry.tags_by_category);
        let weak_skills = weak_skills(&skills, &entry.skill_confidence_map, WEAK_SKILL_LIMIT);
        Self { entry, weak_skills }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Runs a synchronous history operation on the blocking pool so slow disk or
/// Redis I/O never stalls the async workers.
async fn with_history<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    F: FnOnce(&HistoryStore) -> T + Send + 'static,
    T: Send + 'static,
{
    let history = state.history.clone();
    tokio::task::spawn_blocking(move || op(&history))
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("history task failed")))
}

/// POST /api/v1/analyses
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<EntryDetailResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }
    let entry = with_history(&state, move |history| analyze_and_save(history, &request))
        .await?
        .ok_or_else(|| AppError::Storage("analysis could not be saved".to_string()))?;
    Ok(Json(entry.into()))
}

/// GET /api/v1/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
) -> Result<Json<HistoryListing>, AppError> {
    let listing = with_history(&state, |history| history.get_all_with_corruption_info()).await?;
    Ok(Json(listing))
}

/// GET /api/v1/analyses/latest
pub async fn handle_latest_analysis(
    State(state): State<AppState>,
) -> Result<Json<EntryDetailResponse>, AppError> {
    let entry = with_history(&state, |history| {
        let latest = history.get_latest()?;
        Some(ensure_company_intel(history, &latest.id).unwrap_or(latest))
    })
    .await?
    .ok_or_else(|| AppError::NotFound("no analyses yet".to_string()))?;
    Ok(Json(entry.into()))
}

/// GET /api/v1/analyses/:id
///
/// Entries saved without company intel get it generated and persisted here.
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntryDetailResponse>, AppError> {
    let lookup = id.clone();
    let entry = with_history(&state, move |history| ensure_company_intel(history, &lookup))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("analysis {id}")))?;
    Ok(Json(entry.into()))
}

/// PUT /api/v1/analyses/:id/skills
pub async fn handle_set_skill_confidence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SkillConfidenceRequest>,
) -> Result<Json<EntryDetailResponse>, AppError> {
    if request.skill.trim().is_empty() {
        return Err(AppError::Validation("skill cannot be empty".to_string()));
    }
    let confidence = Confidence::parse(&request.confidence).ok_or_else(|| {
        AppError::Validation("confidence must be 'know' or 'practice'".to_string())
    })?;

    let entry = with_history(&state, move |history| {
        set_skill_confidence(history, &id, &request.skill, confidence)
    })
    .await??;
    Ok(Json(entry.into()))
}

/// GET /api/v1/analyses/:id/export
pub async fn handle_export_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let lookup = id.clone();
    let entry = with_history(&state, move |history| history.get_by_id(&lookup))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("analysis {id}")))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        export_text(&entry),
    ))
}
