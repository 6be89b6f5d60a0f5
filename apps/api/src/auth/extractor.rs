//! Request-context extractors for session auth.
//!
//! `AuthUser` is the capability handlers take explicitly when an endpoint
//! requires a logged-in caller; `MaybeAuthUser` is the lenient variant for
//! endpoints that merely report auth state.

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::store;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "sid";

/// An authenticated caller, resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub session_id: Uuid,
}

/// Auth state without a 401 rejection; `GET /api/auth/status` uses this.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

/// Pulls the session id out of a `Cookie` request header.
pub fn session_id_from_cookie_header(header: &str) -> Option<Uuid> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

async fn resolve_session(state: &AppState, parts: &Parts) -> Result<Option<AuthUser>, AppError> {
    let Some(header) = parts.headers.get(COOKIE).and_then(|v| v.to_str().ok()) else {
        return Ok(None);
    };
    let Some(session_id) = session_id_from_cookie_header(header) else {
        return Ok(None);
    };

    let Some(session) = store::get_session(&state.db, session_id).await? else {
        return Ok(None);
    };
    if session.expires_at < Utc::now() {
        // Lazy expiry: drop the stale row so the cookie cannot be replayed.
        store::delete_session(&state.db, session_id).await?;
        return Ok(None);
    }

    let user = store::get_user_by_id(&state.db, session.user_id).await?;
    Ok(user.map(|user| AuthUser { user, session_id }))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        resolve_session(&state, parts)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(MaybeAuthUser(resolve_session(&state, parts).await?))
    }
}
