use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;

use crate::errors::AppError;
use crate::jobs::filters::{JobFilters, JobsQuery};
use crate::jobs::store;
use crate::models::job::JobWithCompany;
use crate::state::AppState;

/// GET /api/jobs
///
/// Public search endpoint. Zero matches is an empty list, never an error.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<Vec<JobWithCompany>>, AppError> {
    let filters = JobFilters::from_query(query);
    let jobs = store::search_jobs(&state.db, &filters, Utc::now()).await?;
    let decorated = store::with_companies(&state.db, jobs).await?;
    Ok(Json(decorated))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JobWithCompany>, AppError> {
    let job = store::get_job_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    let company = match job.company_id {
        Some(company_id) => store::get_company_by_id(&state.db, company_id).await?,
        None => None,
    };
    Ok(Json(JobWithCompany { job, company }))
}
