//! Resume queries. The "at most one default per user" invariant lives here:
//! every write that can set `is_default` runs the unset and the write inside
//! one transaction, so concurrent updates cannot leave zero or two defaults.

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::resume::Resume;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResume {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_default: Option<bool>,
}

pub async fn get_resumes_by_user_id(
    pool: &PgPool,
    user_id: i32,
) -> Result<Vec<Resume>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY is_default DESC, updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_resume_by_id(pool: &PgPool, id: i32) -> Result<Option<Resume>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_default_resume_by_user_id(
    pool: &PgPool,
    user_id: i32,
) -> Result<Option<Resume>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 AND is_default")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Write surface for resume rows. The insert/update orchestration runs
/// against this trait so the clear-then-write sequence can be checked
/// without a database; the real implementation is a Postgres transaction.
#[async_trait]
trait ResumeWrite {
    /// Drops the default flag from every resume of `user_id` except `keep`.
    async fn clear_other_defaults(
        &mut self,
        user_id: i32,
        keep: Option<i32>,
    ) -> Result<(), sqlx::Error>;
    async fn insert_row(&mut self, user_id: i32, new: &NewResume) -> Result<Resume, sqlx::Error>;
    async fn update_row(&mut self, id: i32, patch: &ResumePatch) -> Result<Resume, sqlx::Error>;
}

#[async_trait]
impl ResumeWrite for Transaction<'_, Postgres> {
    async fn clear_other_defaults(
        &mut self,
        user_id: i32,
        keep: Option<i32>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE resumes SET is_default = FALSE
            WHERE user_id = $1 AND is_default AND ($2::INT IS NULL OR id <> $2)
            "#,
        )
        .bind(user_id)
        .bind(keep)
        .execute(&mut **self)
        .await?;
        Ok(())
    }

    async fn insert_row(&mut self, user_id: i32, new: &NewResume) -> Result<Resume, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO resumes (user_id, title, content, is_default)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&new.title)
        .bind(&new.content)
        .bind(new.is_default)
        .fetch_one(&mut **self)
        .await
    }

    async fn update_row(&mut self, id: i32, patch: &ResumePatch) -> Result<Resume, sqlx::Error> {
        sqlx::query_as(
            r#"
            UPDATE resumes SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                is_default = COALESCE($4, is_default),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(patch.is_default)
        .fetch_one(&mut **self)
        .await
    }
}

async fn create_resume_in<W: ResumeWrite + Send>(
    writer: &mut W,
    user_id: i32,
    new: &NewResume,
) -> Result<Resume, sqlx::Error> {
    if new.is_default {
        writer.clear_other_defaults(user_id, None).await?;
    }
    writer.insert_row(user_id, new).await
}

async fn patch_resume_in<W: ResumeWrite + Send>(
    writer: &mut W,
    id: i32,
    user_id: i32,
    patch: &ResumePatch,
) -> Result<Resume, sqlx::Error> {
    if patch.is_default == Some(true) {
        writer.clear_other_defaults(user_id, Some(id)).await?;
    }
    writer.update_row(id, patch).await
}

pub async fn insert_resume(
    pool: &PgPool,
    user_id: i32,
    new: &NewResume,
) -> Result<Resume, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let resume = create_resume_in(&mut tx, user_id, new).await?;
    tx.commit().await?;
    Ok(resume)
}

pub async fn update_resume(
    pool: &PgPool,
    id: i32,
    user_id: i32,
    patch: &ResumePatch,
) -> Result<Resume, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let resume = patch_resume_in(&mut tx, id, user_id, patch).await?;
    tx.commit().await?;
    Ok(resume)
}

pub async fn delete_resume(pool: &PgPool, id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    struct FakeWriter {
        rows: Vec<Resume>,
    }

    fn make_resume(id: i32, user_id: i32, is_default: bool) -> Resume {
        Resume {
            id,
            user_id,
            title: format!("Resume {id}"),
            content: "experience".to_string(),
            is_default,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[async_trait]
    impl ResumeWrite for FakeWriter {
        async fn clear_other_defaults(
            &mut self,
            user_id: i32,
            keep: Option<i32>,
        ) -> Result<(), sqlx::Error> {
            for row in &mut self.rows {
                if row.user_id == user_id && Some(row.id) != keep {
                    row.is_default = false;
                }
            }
            Ok(())
        }

        async fn insert_row(
            &mut self,
            user_id: i32,
            new: &NewResume,
        ) -> Result<Resume, sqlx::Error> {
            let id = self.rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
            let mut row = make_resume(id, user_id, new.is_default);
            row.title = new.title.clone();
            row.content = new.content.clone();
            self.rows.push(row.clone());
            Ok(row)
        }

        async fn update_row(
            &mut self,
            id: i32,
            patch: &ResumePatch,
        ) -> Result<Resume, sqlx::Error> {
            let row = self
                .rows
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or(sqlx::Error::RowNotFound)?;
            if let Some(title) = &patch.title {
                row.title = title.clone();
            }
            if let Some(content) = &patch.content {
                row.content = content.clone();
            }
            if let Some(is_default) = patch.is_default {
                row.is_default = is_default;
            }
            Ok(row.clone())
        }
    }

    fn default_count(rows: &[Resume], user_id: i32) -> usize {
        rows.iter()
            .filter(|row| row.user_id == user_id && row.is_default)
            .count()
    }

    #[tokio::test]
    async fn test_new_default_demotes_existing_default() {
        let mut writer = FakeWriter {
            rows: vec![make_resume(1, 1, true), make_resume(2, 2, true)],
        };
        let new = NewResume {
            title: "Backend".to_string(),
            content: "experience".to_string(),
            is_default: true,
        };

        let created = create_resume_in(&mut writer, 1, &new).await.unwrap();
        assert!(created.is_default);
        assert_eq!(default_count(&writer.rows, 1), 1);
        assert!(!writer.rows[0].is_default);
        // Another user's default is not touched.
        assert_eq!(default_count(&writer.rows, 2), 1);
    }

    #[tokio::test]
    async fn test_non_default_insert_keeps_existing_default() {
        let mut writer = FakeWriter {
            rows: vec![make_resume(1, 1, true)],
        };
        let new = NewResume {
            title: "Backend".to_string(),
            content: "experience".to_string(),
            is_default: false,
        };

        let created = create_resume_in(&mut writer, 1, &new).await.unwrap();
        assert!(!created.is_default);
        assert!(writer.rows[0].is_default);
        assert_eq!(default_count(&writer.rows, 1), 1);
    }

    #[tokio::test]
    async fn test_promoting_patch_moves_the_flag() {
        let mut writer = FakeWriter {
            rows: vec![make_resume(1, 1, true), make_resume(2, 1, false)],
        };
        let patch = ResumePatch {
            is_default: Some(true),
            ..Default::default()
        };

        let updated = patch_resume_in(&mut writer, 2, 1, &patch).await.unwrap();
        assert!(updated.is_default);
        assert!(!writer.rows[0].is_default);
        assert_eq!(default_count(&writer.rows, 1), 1);
    }

    #[tokio::test]
    async fn test_repromoting_current_default_is_stable() {
        let mut writer = FakeWriter {
            rows: vec![make_resume(1, 1, true)],
        };
        let patch = ResumePatch {
            is_default: Some(true),
            ..Default::default()
        };

        let updated = patch_resume_in(&mut writer, 1, 1, &patch).await.unwrap();
        assert!(updated.is_default);
        assert_eq!(default_count(&writer.rows, 1), 1);
    }
}
