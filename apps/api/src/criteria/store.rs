use serde::Deserialize;
use sqlx::PgPool;

use crate::models::job::{ExperienceLevel, JobType};
use crate::models::search_criteria::SearchCriteria;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCriteria {
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub job_type: Option<JobType>,
    pub date_posted: Option<String>,
    #[serde(default)]
    pub auto_apply: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaPatch {
    pub title: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub location: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub job_type: Option<JobType>,
    pub date_posted: Option<String>,
    pub auto_apply: Option<bool>,
}

pub async fn get_criteria_by_user_id(
    pool: &PgPool,
    user_id: i32,
) -> Result<Vec<SearchCriteria>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM search_criteria WHERE user_id = $1 ORDER BY updated_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn get_criteria_by_id(
    pool: &PgPool,
    id: i32,
) -> Result<Option<SearchCriteria>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM search_criteria WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_criteria(
    pool: &PgPool,
    user_id: i32,
    new: &NewCriteria,
) -> Result<SearchCriteria, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO search_criteria
            (user_id, title, keywords, location, experience_level, job_type,
             date_posted, auto_apply)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&new.title)
    .bind(&new.keywords)
    .bind(&new.location)
    .bind(new.experience_level)
    .bind(new.job_type)
    .bind(&new.date_posted)
    .bind(new.auto_apply)
    .fetch_one(pool)
    .await
}

pub async fn update_criteria(
    pool: &PgPool,
    id: i32,
    patch: &CriteriaPatch,
) -> Result<SearchCriteria, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE search_criteria SET
            title = COALESCE($2, title),
            keywords = COALESCE($3, keywords),
            location = COALESCE($4, location),
            experience_level = COALESCE($5, experience_level),
            job_type = COALESCE($6, job_type),
            date_posted = COALESCE($7, date_posted),
            auto_apply = COALESCE($8, auto_apply),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&patch.title)
    .bind(&patch.keywords)
    .bind(&patch.location)
    .bind(patch.experience_level)
    .bind(patch.job_type)
    .bind(&patch.date_posted)
    .bind(patch.auto_apply)
    .fetch_one(pool)
    .await
}

pub async fn delete_criteria(pool: &PgPool, id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM search_criteria WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
