use axum::extract::State;
use axum::response::Redirect;
use axum::Json;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/linkedin/connect
///
/// Placeholder for the OAuth authorize redirect.
pub async fn handle_connect(auth: AuthUser) -> Json<Value> {
    info!("User {} requested LinkedIn connect", auth.user.id);
    Json(json!({ "message": "This would redirect to LinkedIn OAuth" }))
}

/// GET /api/linkedin/callback
///
/// Simulates a successful OAuth exchange: marks the account connected with a
/// sample token valid for 60 days, then sends the browser back to the app.
pub async fn handle_callback(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Redirect, AppError> {
    sqlx::query(
        r#"
        UPDATE users SET
            linkedin_connected = TRUE,
            linkedin_id = $2,
            linkedin_access_token = $3,
            linkedin_token_expiry = $4,
            last_synced = now(),
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(auth.user.id)
    .bind("linkedin123")
    .bind("sample-token")
    .bind(Utc::now() + Duration::days(60))
    .execute(&state.db)
    .await?;

    info!("User {} connected LinkedIn account", auth.user.id);
    Ok(Redirect::to("/"))
}

/// POST /api/linkedin/disconnect
pub async fn handle_disconnect(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    sqlx::query(
        r#"
        UPDATE users SET
            linkedin_connected = FALSE,
            linkedin_access_token = NULL,
            linkedin_token_expiry = NULL,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(auth.user.id)
    .execute(&state.db)
    .await?;

    info!("User {} disconnected LinkedIn account", auth.user.id);
    Ok(Json(json!({
        "message": "LinkedIn account disconnected successfully"
    })))
}
