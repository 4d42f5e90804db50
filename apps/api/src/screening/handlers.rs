use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::models::match_result::MatchResultRow;
use crate::models::resume::ResumeRow;
use crate::screening::extractor::parse_resume_text;
use crate::screening::ingest::load_bytes_to_text;
use crate::screening::run::run_match;
use crate::screening::scorer::MatchResult;
use crate::state::AppState;
use crate::storage::jobs::{self, JobUpdate};
use crate::storage::{matches, resumes};

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub raw_text: String,
    /// Overrides the name inferred from the text.
    pub candidate_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub shortlist_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ShortlistEntry {
    #[serde(flatten)]
    pub result: MatchResult,
    pub candidate_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub job_id: Uuid,
    pub evaluated: usize,
    pub shortlist: Vec<ShortlistEntry>,
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    require_non_blank("title", &req.title)?;
    require_non_blank("description", &req.description)?;
    let job = jobs::create_job(&state.db, req.title.trim(), &req.description, &req.required_skills).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(jobs::list_jobs(&state.db).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job = jobs::get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<JobRow>, AppError> {
    if let Some(title) = &req.title {
        require_non_blank("title", title)?;
    }
    if let Some(description) = &req.description {
        require_non_blank("description", description)?;
    }
    let update = JobUpdate {
        title: req.title.as_deref().map(str::trim),
        description: req.description.as_deref(),
        required_skills: req.required_skills.as_deref(),
    };
    let job = jobs::update_job(&state.db, id, update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !jobs::delete_job(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    require_non_blank("raw_text", &req.raw_text)?;
    let row = store_resume(&state, &req.raw_text, req.candidate_name).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// POST /api/v1/resumes/upload
///
/// Multipart form with a `file` part (.pdf, .txt or .md) and an optional
/// `candidate_name` text part.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut candidate_name = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let part = field.name().map(str::to_string);
        match part.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("candidate_name") => {
                let name = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read candidate_name: {e}")))?;
                candidate_name = Some(name);
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing `file` part".to_string()))?;
    let text = load_bytes_to_text(bytes, &filename).await?;
    let row = store_resume(&state, &text, candidate_name).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn store_resume(
    state: &AppState,
    text: &str,
    candidate_name: Option<String>,
) -> Result<ResumeRow, AppError> {
    let mut parsed = parse_resume_text(text);
    if let Some(name) = candidate_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        parsed.candidate_name = Some(name);
    }
    Ok(resumes::insert_resume(&state.db, &parsed).await?)
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(resumes::list_resumes(&state.db).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let row = resumes::get_resume(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !resumes::delete_resume(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/:id/match
pub async fn handle_match_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<MatchResponse>, AppError> {
    let run = run_match(state.store.as_ref(), &state.matcher, id, query.shortlist_size).await?;
    let evaluated = run.results.len();
    let shortlist = run
        .shortlist
        .into_iter()
        .map(|result| ShortlistEntry {
            candidate_name: run.candidate_names.get(&result.resume_id).cloned(),
            result,
        })
        .collect();
    Ok(Json(MatchResponse {
        job_id: run.job_id,
        evaluated,
        shortlist,
    }))
}

/// GET /api/v1/jobs/:id/matches
///
/// Last persisted run, best first, unfiltered by threshold.
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MatchResultRow>>, AppError> {
    if jobs::get_job(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(Json(matches::list_matches_for_job(&state.db, id).await?))
}
