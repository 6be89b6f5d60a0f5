use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::profile::Profile;

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub skills: Option<Vec<String>>,
    pub education: Option<Value>,
    pub experience: Option<Value>,
}

pub async fn get_profile_by_user_id(
    pool: &PgPool,
    user_id: i32,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Seeds the empty profile created alongside a new account.
pub async fn insert_empty_profile(pool: &PgPool, user_id: i32) -> Result<Profile, sqlx::Error> {
    sqlx::query_as("INSERT INTO profiles (user_id, skills) VALUES ($1, '{}') RETURNING *")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub async fn insert_profile(
    pool: &PgPool,
    user_id: i32,
    patch: &ProfilePatch,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO profiles
            (user_id, headline, summary, location, phone_number, website,
             skills, education, experience)
        VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, ARRAY[]::TEXT[]), $8, $9)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&patch.headline)
    .bind(&patch.summary)
    .bind(&patch.location)
    .bind(&patch.phone_number)
    .bind(&patch.website)
    .bind(&patch.skills)
    .bind(&patch.education)
    .bind(&patch.experience)
    .fetch_one(pool)
    .await
}

pub async fn update_profile(
    pool: &PgPool,
    id: i32,
    patch: &ProfilePatch,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE profiles SET
            headline = COALESCE($2, headline),
            summary = COALESCE($3, summary),
            location = COALESCE($4, location),
            phone_number = COALESCE($5, phone_number),
            website = COALESCE($6, website),
            skills = COALESCE($7, skills),
            education = COALESCE($8, education),
            experience = COALESCE($9, experience),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&patch.headline)
    .bind(&patch.summary)
    .bind(&patch.location)
    .bind(&patch.phone_number)
    .bind(&patch.website)
    .bind(&patch.skills)
    .bind(&patch.education)
    .bind(&patch.experience)
    .fetch_one(pool)
    .await
}
