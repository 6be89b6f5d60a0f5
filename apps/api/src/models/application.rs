use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::company::Company;
use crate::models::job::Job;
use crate::models::resume::Resume;

/// Flat status enum. There is deliberately no transition graph: any
/// authorized update may set any status from any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    InReview,
    Viewed,
    InterviewScheduled,
    Rejected,
    NoResponse,
    Hired,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: i32,
    pub user_id: i32,
    pub job_id: i32,
    pub resume_id: Option<i32>,
    pub application_date: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub last_status_update: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List shape: application decorated with its job and the job's company.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWithJob {
    pub application: JobApplication,
    pub job: Job,
    pub company: Option<Company>,
}

/// Detail shape adds the resume the application was submitted with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetail {
    pub application: JobApplication,
    pub job: Job,
    pub company: Option<Company>,
    pub resume: Option<Resume>,
}
