use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub linkedin_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
