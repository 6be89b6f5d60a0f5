use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::Session;
use crate::models::user::User;

pub async fn get_user_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub email: &'a str,
    pub full_name: &'a str,
}

pub async fn insert_user(pool: &PgPool, user: NewUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO users (username, password, email, full_name)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user.username)
    .bind(user.password_hash)
    .bind(user.email)
    .bind(user.full_name)
    .fetch_one(pool)
    .await
}

/// Creates a session row with the given lifetime and returns it.
pub async fn create_session(
    pool: &PgPool,
    user_id: i32,
    ttl_days: i64,
) -> Result<Session, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO sessions (id, user_id, expires_at) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(Utc::now() + Duration::days(ttl_days))
    .fetch_one(pool)
    .await
}

pub async fn get_session(pool: &PgPool, id: Uuid) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM sessions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn delete_session(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
