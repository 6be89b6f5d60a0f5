use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::company::Company;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Temporary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "experience_level", rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub linkedin_job_id: Option<String>,
    pub title: String,
    pub company_id: Option<i32>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub skills: Vec<String>,
    pub is_easy_apply: bool,
    pub posted_date: Option<DateTime<Utc>>,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A job decorated with its company, the shape returned by the search and
/// detail endpoints. `company` is null when the company record is gone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobWithCompany {
    #[serde(flatten)]
    pub job: Job,
    pub company: Option<Company>,
}
