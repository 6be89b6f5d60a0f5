use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::extractor::AuthUser;
use crate::criteria::store::{self, CriteriaPatch, NewCriteria};
use crate::errors::AppError;
use crate::models::search_criteria::SearchCriteria;
use crate::state::AppState;

async fn owned_criteria(
    state: &AppState,
    id: i32,
    user_id: i32,
) -> Result<SearchCriteria, AppError> {
    let criteria = store::get_criteria_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Search criteria not found".to_string()))?;
    if criteria.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(criteria)
}

/// GET /api/search-criteria
pub async fn handle_list_criteria(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SearchCriteria>>, AppError> {
    let criteria = store::get_criteria_by_user_id(&state.db, auth.user.id).await?;
    Ok(Json(criteria))
}

/// POST /api/search-criteria
pub async fn handle_create_criteria(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(new): Json<NewCriteria>,
) -> Result<(StatusCode, Json<SearchCriteria>), AppError> {
    if new.title.len() < 2 {
        return Err(AppError::Validation(
            "Title must be at least 2 characters".to_string(),
        ));
    }
    let criteria = store::insert_criteria(&state.db, auth.user.id, &new).await?;
    Ok((StatusCode::CREATED, Json(criteria)))
}

/// PUT /api/search-criteria/:id
pub async fn handle_update_criteria(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
    Json(patch): Json<CriteriaPatch>,
) -> Result<Json<SearchCriteria>, AppError> {
    owned_criteria(&state, id, auth.user.id).await?;
    if matches!(&patch.title, Some(title) if title.len() < 2) {
        return Err(AppError::Validation(
            "Title must be at least 2 characters".to_string(),
        ));
    }
    let criteria = store::update_criteria(&state.db, id, &patch).await?;
    Ok(Json(criteria))
}

/// DELETE /api/search-criteria/:id
pub async fn handle_delete_criteria(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    owned_criteria(&state, id, auth.user.id).await?;
    store::delete_criteria(&state.db, id).await?;
    Ok(Json(json!({ "message": "Search criteria deleted successfully" })))
}
