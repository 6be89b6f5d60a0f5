//! Axum route handlers for the application pipeline.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::applications::apply::{
    apply_to_job, resolve_resume_id, ApplyOutcome, BatchItemResult, BATCH_NOTES,
};
use crate::applications::stats::{stats_for_user, ApplicationStats};
use crate::applications::store::{self, ApplicationPatch, NewApplication};
use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::application::{
    ApplicationDetail, ApplicationStatus, ApplicationWithJob, JobApplication,
};
use crate::resumes::store as resumes_store;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// GET /api/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    auth: AuthUser,
) -> Result<Json<Vec<ApplicationWithJob>>, AppError> {
    let applications =
        store::get_applications_by_user_id(&state.db, auth.user.id, query.status).await?;
    let decorated = store::decorate_applications(&state.db, applications).await?;
    Ok(Json(decorated))
}

/// GET /api/applications/recent
pub async fn handle_recent_applications(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
    auth: AuthUser,
) -> Result<Json<Vec<ApplicationWithJob>>, AppError> {
    let limit = query.limit.unwrap_or(5).max(1);
    let applications = store::get_recent_applications(&state.db, auth.user.id, limit).await?;
    let decorated = store::decorate_applications(&state.db, applications).await?;
    Ok(Json(decorated))
}

async fn owned_application(
    state: &AppState,
    id: i32,
    user_id: i32,
) -> Result<JobApplication, AppError> {
    let application = store::get_application_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    if application.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(application)
}

/// GET /api/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
) -> Result<Json<ApplicationDetail>, AppError> {
    let application = owned_application(&state, id, auth.user.id).await?;

    let mut decorated =
        store::decorate_applications(&state.db, vec![application.clone()]).await?;
    let row = decorated
        .pop()
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    let resume = match application.resume_id {
        Some(resume_id) => resumes_store::get_resume_by_id(&state.db, resume_id).await?,
        None => None,
    };

    Ok(Json(ApplicationDetail {
        application: row.application,
        job: row.job,
        company: row.company,
        resume,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicationRequest {
    pub job_id: i32,
    pub resume_id: Option<i32>,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
}

/// POST /api/applications
///
/// Direct insert for manually tracked applications; unlike /api/apply this
/// performs no duplicate check.
pub async fn handle_create_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewApplicationRequest>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    let application = store::insert_application(
        &state.db,
        NewApplication {
            user_id: auth.user.id,
            job_id: req.job_id,
            resume_id: req.resume_id,
            status: req.status.unwrap_or(ApplicationStatus::Applied),
            notes: req.notes.as_deref(),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    pub status: Option<ApplicationStatus>,
    pub resume_id: Option<i32>,
    pub notes: Option<String>,
}

/// PUT /api/applications/:id
///
/// Status is a flat enum; any value may be set from any value.
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
    Json(req): Json<UpdateApplicationRequest>,
) -> Result<Json<JobApplication>, AppError> {
    owned_application(&state, id, auth.user.id).await?;
    let application = store::update_application(
        &state.db,
        id,
        &ApplicationPatch {
            status: req.status,
            resume_id: req.resume_id,
            notes: req.notes,
        },
    )
    .await?;
    Ok(Json(application))
}

/// GET /api/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApplicationStats>, AppError> {
    let stats = stats_for_user(&state.db, auth.user.id).await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: i32,
    pub resume_id: Option<i32>,
    pub notes: Option<String>,
}

/// POST /api/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    let resume_id = resolve_resume_id(&state.db, auth.user.id, req.resume_id).await?;
    let outcome = apply_to_job(
        &state.db,
        auth.user.id,
        req.job_id,
        resume_id,
        req.notes.as_deref(),
    )
    .await?;

    match outcome {
        ApplyOutcome::Applied(application) => {
            info!(
                "User {} applied to job {} (application {})",
                auth.user.id, req.job_id, application.id
            );
            Ok((StatusCode::CREATED, Json(application)))
        }
        ApplyOutcome::JobNotFound => Err(AppError::NotFound("Job not found".to_string())),
        ApplyOutcome::AlreadyApplied => Err(AppError::Conflict(
            "You have already applied to this job".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchApplyRequest {
    pub job_ids: Vec<i32>,
    pub resume_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct BatchApplyResponse {
    pub results: Vec<BatchItemResult>,
}

/// POST /api/apply-batch
///
/// Best-effort: the response is always 201, with a per-job outcome list.
pub async fn handle_apply_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BatchApplyRequest>,
) -> Result<(StatusCode, Json<BatchApplyResponse>), AppError> {
    if req.job_ids.is_empty() {
        return Err(AppError::Validation("Job IDs are required".to_string()));
    }

    // Shared resume resolved once for the whole batch.
    let resume_id = resolve_resume_id(&state.db, auth.user.id, req.resume_id).await?;

    let mut results = Vec::with_capacity(req.job_ids.len());
    for job_id in req.job_ids {
        let item = match apply_to_job(&state.db, auth.user.id, job_id, resume_id, Some(BATCH_NOTES))
            .await
        {
            Ok(outcome) => BatchItemResult::from_outcome(job_id, outcome),
            Err(e) => {
                warn!("Batch apply to job {job_id} failed: {e}");
                BatchItemResult::failed(job_id)
            }
        };
        results.push(item);
    }

    info!(
        "Batch apply for user {}: {}/{} succeeded",
        auth.user.id,
        results.iter().filter(|r| r.success).count(),
        results.len()
    );

    Ok((StatusCode::CREATED, Json(BatchApplyResponse { results })))
}
