use axum::extract::State;
use axum::Json;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::profile::store::{self, ProfilePatch};
use crate::state::AppState;

/// GET /api/user/profile
///
/// The caller's profile, or JSON null if they never filled one in.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Option<Profile>>, AppError> {
    let profile = store::get_profile_by_user_id(&state.db, auth.user.id).await?;
    Ok(Json(profile))
}

/// PUT /api/user/profile
///
/// Upsert: creates the profile when absent, otherwise applies the patch.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<Profile>, AppError> {
    let existing = store::get_profile_by_user_id(&state.db, auth.user.id).await?;
    let profile = match existing {
        Some(profile) => store::update_profile(&state.db, profile.id, &patch).await?,
        None => store::insert_profile(&state.db, auth.user.id, &patch).await?,
    };
    Ok(Json(profile))
}
