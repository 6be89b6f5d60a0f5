use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Argon2 hash. Never serialized into API responses.
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub linkedin_id: Option<String>,
    #[serde(skip_serializing)]
    pub linkedin_access_token: Option<String>,
    pub linkedin_token_expiry: Option<DateTime<Utc>>,
    pub linkedin_connected: bool,
    pub profile_picture: Option<String>,
    pub last_synced: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of the account echoed by `GET /api/auth/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub linkedin_connected: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            linkedin_connected: user.linkedin_connected,
        }
    }
}
