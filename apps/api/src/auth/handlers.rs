//! Axum route handlers for registration, login, logout and auth status.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::AppendHeaders;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::extractor::{AuthUser, MaybeAuthUser, SESSION_COOKIE};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::store::{self, NewUser};
use crate::errors::AppError;
use crate::models::user::UserSummary;
use crate::profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: i32,
    pub username: String,
}

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if req.username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    if req.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if !is_plausible_email(&req.email) {
        return Err(AppError::Validation(
            "Must provide a valid email".to_string(),
        ));
    }
    if req.full_name.len() < 2 {
        return Err(AppError::Validation(
            "Full name must be at least 2 characters".to_string(),
        ));
    }
    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

fn session_cookie(session_id: uuid::Uuid, ttl_days: i64) -> String {
    format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl_days * 86_400
    )
}

fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// The 401 for a failed login. Wrong username and wrong password read the
/// same, so a caller cannot tell which half was off.
fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

/// A throwaway hash verified against when the username does not resolve.
fn dummy_hash() -> &'static str {
    static DUMMY: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    DUMMY.get_or_init(|| hash_password("placeholder").unwrap_or_default())
}

/// POST /api/auth/register
///
/// Creates the account, an empty profile, and a logged-in session in one go.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<
    (
        StatusCode,
        AppendHeaders<[(axum::http::HeaderName, String); 1]>,
        Json<AuthResponse>,
    ),
    AppError,
> {
    validate_registration(&req)?;

    if store::get_user_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }
    if store::get_user_by_email(&state.db, &req.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = store::insert_user(
        &state.db,
        NewUser {
            username: &req.username,
            password_hash: &password_hash,
            email: &req.email,
            full_name: &req.full_name,
        },
    )
    .await?;

    // New accounts start with an empty profile so skill-based
    // recommendations have a row to hang off later.
    profile::store::insert_empty_profile(&state.db, user.id).await?;

    let session = store::create_session(&state.db, user.id, state.config.session_ttl_days).await?;
    info!("Registered user {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(
            SET_COOKIE,
            session_cookie(session.id, state.config.session_ttl_days),
        )]),
        Json(AuthResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<
    (
        AppendHeaders<[(axum::http::HeaderName, String); 1]>,
        Json<AuthResponse>,
    ),
    AppError,
> {
    let (Some(username), Some(password)) = (req.username.as_deref(), req.password.as_deref())
    else {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    };

    let user = store::get_user_by_username(&state.db, username).await?;
    // Verify even for unknown users to keep the timing profile flat.
    let matched = match &user {
        Some(user) => verify_password(password, &user.password),
        None => {
            let _ = verify_password(password, dummy_hash());
            false
        }
    };
    let user = match (user, matched) {
        (Some(user), true) => user,
        _ => return Err(invalid_credentials()),
    };

    let session = store::create_session(&state.db, user.id, state.config.session_ttl_days).await?;
    info!("User {} logged in", user.id);

    Ok((
        AppendHeaders([(
            SET_COOKIE,
            session_cookie(session.id, state.config.session_ttl_days),
        )]),
        Json(AuthResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// POST /api/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
) -> Result<
    (
        AppendHeaders<[(axum::http::HeaderName, String); 1]>,
        Json<Value>,
    ),
    AppError,
> {
    if let MaybeAuthUser(Some(AuthUser { session_id, .. })) = auth {
        store::delete_session(&state.db, session_id).await?;
    }
    Ok((
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(json!({ "message": "Logged out successfully" })),
    ))
}

/// GET /api/auth/status
///
/// Always 200; reports whether the caller holds a live session.
pub async fn handle_status(auth: MaybeAuthUser) -> Json<Value> {
    match auth.0 {
        Some(AuthUser { user, .. }) => Json(json!({
            "isAuthenticated": true,
            "user": UserSummary::from(&user),
        })),
        None => Json(json!({ "isAuthenticated": false })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request() -> RegisterRequest {
        RegisterRequest {
            username: "jobseeker".to_string(),
            password: "longenough".to_string(),
            email: "seeker@example.com".to_string(),
            full_name: "Job Seeker".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(validate_registration(&make_request()).is_ok());
    }

    #[test]
    fn test_short_username_rejected() {
        let mut req = make_request();
        req.username = "ab".to_string();
        let err = validate_registration(&req).unwrap_err();
        assert!(err.to_string().contains("at least 3 characters"));
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = make_request();
        req.password = "1234567".to_string();
        assert!(validate_registration(&req).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("no-at-sign"));
        assert!(!is_plausible_email("@b.co"));
        assert!(!is_plausible_email("a@nodot"));
        assert!(!is_plausible_email("a@b."));
    }

    #[test]
    fn test_failed_login_error_names_the_credentials() {
        use axum::response::IntoResponse;

        let err = invalid_credentials();
        assert!(err.to_string().contains("Invalid credentials"));
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let id = uuid::Uuid::new_v4();
        let cookie = session_cookie(id, 30);
        assert!(cookie.starts_with(&format!("sid={id}")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=2592000"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
