use std::collections::HashMap;

use sqlx::PgPool;

use crate::jobs::store as jobs_store;
use crate::models::application::{
    ApplicationStatus, ApplicationWithJob, JobApplication,
};
use crate::models::company::Company;
use crate::models::job::Job;

pub async fn get_applications_by_user_id(
    pool: &PgPool,
    user_id: i32,
    status: Option<ApplicationStatus>,
) -> Result<Vec<JobApplication>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM job_applications
        WHERE user_id = $1 AND ($2::application_status IS NULL OR status = $2)
        ORDER BY application_date DESC
        "#,
    )
    .bind(user_id)
    .bind(status)
    .fetch_all(pool)
    .await
}

pub async fn get_recent_applications(
    pool: &PgPool,
    user_id: i32,
    limit: i64,
) -> Result<Vec<JobApplication>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM job_applications
        WHERE user_id = $1
        ORDER BY application_date DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_application_by_id(
    pool: &PgPool,
    id: i32,
) -> Result<Option<JobApplication>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM job_applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Duplicate-application guard: one query, not a scan of the caller's whole
/// history. Checked at submission time; the schema carries no unique
/// constraint on (user, job).
pub async fn application_exists(
    pool: &PgPool,
    user_id: i32,
    job_id: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM job_applications WHERE user_id = $1 AND job_id = $2)",
    )
    .bind(user_id)
    .bind(job_id)
    .fetch_one(pool)
    .await
}

pub struct NewApplication<'a> {
    pub user_id: i32,
    pub job_id: i32,
    pub resume_id: Option<i32>,
    pub status: ApplicationStatus,
    pub notes: Option<&'a str>,
}

pub async fn insert_application(
    pool: &PgPool,
    new: NewApplication<'_>,
) -> Result<JobApplication, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO job_applications
            (user_id, job_id, resume_id, status, notes, application_date, last_status_update)
        VALUES ($1, $2, $3, $4, $5, now(), now())
        RETURNING *
        "#,
    )
    .bind(new.user_id)
    .bind(new.job_id)
    .bind(new.resume_id)
    .bind(new.status)
    .bind(new.notes)
    .fetch_one(pool)
    .await
}

pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub resume_id: Option<i32>,
    pub notes: Option<String>,
}

/// Partial update. `last_status_update` is advanced server-side whenever the
/// status field is part of the patch.
pub async fn update_application(
    pool: &PgPool,
    id: i32,
    patch: &ApplicationPatch,
) -> Result<JobApplication, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE job_applications SET
            status = COALESCE($2, status),
            resume_id = COALESCE($3, resume_id),
            notes = COALESCE($4, notes),
            last_status_update = CASE
                WHEN $2::application_status IS NOT NULL THEN now()
                ELSE last_status_update
            END,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(patch.status)
    .bind(patch.resume_id)
    .bind(&patch.notes)
    .fetch_one(pool)
    .await
}

pub async fn count_applications(pool: &PgPool, user_id: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM job_applications WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Everything past "applied" that is not "no_response" counts as a response.
pub async fn count_responses(pool: &PgPool, user_id: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM job_applications
        WHERE user_id = $1 AND status NOT IN ('applied', 'no_response')
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn count_interviews(pool: &PgPool, user_id: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM job_applications WHERE user_id = $1 AND status = 'interview_scheduled'",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Stitches applications with their jobs and companies. Pure so the shape
/// logic is testable without a database.
pub fn stitch_applications(
    applications: Vec<JobApplication>,
    jobs: Vec<Job>,
    companies: Vec<Company>,
) -> Vec<ApplicationWithJob> {
    let jobs_by_id: HashMap<i32, Job> = jobs.into_iter().map(|j| (j.id, j)).collect();
    let companies_by_id: HashMap<i32, Company> =
        companies.into_iter().map(|c| (c.id, c)).collect();

    applications
        .into_iter()
        .filter_map(|application| {
            let job = jobs_by_id.get(&application.job_id).cloned()?;
            let company = job
                .company_id
                .and_then(|id| companies_by_id.get(&id).cloned());
            Some(ApplicationWithJob {
                application,
                job,
                company,
            })
        })
        .collect()
}

/// Decorates a page of applications with job + company in two round trips.
pub async fn decorate_applications(
    pool: &PgPool,
    applications: Vec<JobApplication>,
) -> Result<Vec<ApplicationWithJob>, sqlx::Error> {
    let mut job_ids: Vec<i32> = applications.iter().map(|a| a.job_id).collect();
    job_ids.sort_unstable();
    job_ids.dedup();
    let jobs = if job_ids.is_empty() {
        Vec::new()
    } else {
        jobs_store::jobs_by_ids(pool, &job_ids).await?
    };

    let mut company_ids: Vec<i32> = jobs.iter().filter_map(|j| j.company_id).collect();
    company_ids.sort_unstable();
    company_ids.dedup();
    let companies = if company_ids.is_empty() {
        Vec::new()
    } else {
        jobs_store::companies_by_ids(pool, &company_ids).await?
    };

    Ok(stitch_applications(applications, jobs, companies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_application(id: i32, job_id: i32) -> JobApplication {
        JobApplication {
            id,
            user_id: 1,
            job_id,
            resume_id: None,
            application_date: Utc::now(),
            status: ApplicationStatus::Applied,
            last_status_update: Utc::now(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_job(id: i32, company_id: Option<i32>) -> Job {
        Job {
            id,
            linkedin_job_id: None,
            title: format!("Job {id}"),
            company_id,
            description: None,
            location: None,
            salary: None,
            job_type: None,
            experience_level: None,
            skills: vec![],
            is_easy_apply: false,
            posted_date: None,
            url: "https://example.com".to_string(),
            created_at: Utc::now(),
        }
    }

    fn make_company(id: i32) -> Company {
        Company {
            id,
            name: format!("Company {id}"),
            logo: None,
            website: None,
            linkedin_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_stitch_keeps_application_order() {
        let applications = vec![make_application(1, 20), make_application(2, 10)];
        let jobs = vec![make_job(10, Some(5)), make_job(20, None)];
        let companies = vec![make_company(5)];

        let rows = stitch_applications(applications, jobs, companies);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].application.id, 1);
        assert_eq!(rows[0].job.id, 20);
        assert!(rows[0].company.is_none());
        assert_eq!(rows[1].company.as_ref().unwrap().id, 5);
    }

    #[test]
    fn test_stitch_drops_rows_without_job() {
        // FK cascade makes this unreachable in practice; the shape still
        // shouldn't panic if a job page is missing an id.
        let applications = vec![make_application(1, 999)];
        let rows = stitch_applications(applications, vec![], vec![]);
        assert!(rows.is_empty());
    }
}
