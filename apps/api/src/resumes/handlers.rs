use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::resumes::store::{self, NewResume, ResumePatch};
use crate::state::AppState;

/// Loads a resume and checks it belongs to the caller.
async fn owned_resume(state: &AppState, id: i32, user_id: i32) -> Result<Resume, AppError> {
    let resume = store::get_resume_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
    if resume.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(resume)
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Resume>>, AppError> {
    let resumes = store::get_resumes_by_user_id(&state.db, auth.user.id).await?;
    Ok(Json(resumes))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
) -> Result<Json<Resume>, AppError> {
    let resume = owned_resume(&state, id, auth.user.id).await?;
    Ok(Json(resume))
}

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(new): Json<NewResume>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    if new.title.len() < 2 {
        return Err(AppError::Validation(
            "Title must be at least 2 characters".to_string(),
        ));
    }
    let resume = store::insert_resume(&state.db, auth.user.id, &new).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// PUT /api/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
    Json(patch): Json<ResumePatch>,
) -> Result<Json<Resume>, AppError> {
    owned_resume(&state, id, auth.user.id).await?;
    if matches!(&patch.title, Some(title) if title.len() < 2) {
        return Err(AppError::Validation(
            "Title must be at least 2 characters".to_string(),
        ));
    }
    let resume = store::update_resume(&state.db, id, auth.user.id, &patch).await?;
    Ok(Json(resume))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    owned_resume(&state, id, auth.user.id).await?;
    store::delete_resume(&state.db, id).await?;
    Ok(Json(json!({ "message": "Resume deleted successfully" })))
}
