use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub skills: Vec<String>,
    pub education: Option<Value>,
    pub experience: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
