use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::job::{ExperienceLevel, JobType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub job_type: Option<JobType>,
    /// Relative date window: "day", "week" or "month". Stored as free text;
    /// unrecognized values impose no lower bound at search time.
    pub date_posted: Option<String>,
    pub auto_apply: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
