use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::jobs::filters::JobFilters;
use crate::models::company::Company;
use crate::models::job::{Job, JobWithCompany};

/// Composes the filter set into a single SELECT. Present fields become
/// predicates ANDed onto the base query; pagination and ordering are fixed.
pub async fn search_jobs(
    pool: &PgPool,
    filters: &JobFilters,
    now: DateTime<Utc>,
) -> Result<Vec<Job>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM jobs WHERE TRUE");

    if let Some(title) = &filters.title {
        qb.push(" AND title LIKE ");
        qb.push_bind(format!("%{title}%"));
    }
    if let Some(location) = &filters.location {
        qb.push(" AND location LIKE ");
        qb.push_bind(format!("%{location}%"));
    }
    if let Some(level) = filters.experience_level {
        qb.push(" AND experience_level = ");
        qb.push_bind(level);
    }
    if let Some(job_type) = filters.job_type {
        qb.push(" AND job_type = ");
        qb.push_bind(job_type);
    }
    if let Some(easy_apply) = filters.is_easy_apply {
        qb.push(" AND is_easy_apply = ");
        qb.push_bind(easy_apply);
    }
    if let Some(window) = filters.posted_window {
        qb.push(" AND posted_date >= ");
        qb.push_bind(window.cutoff(now));
    }

    qb.push(" ORDER BY posted_date DESC");
    qb.push(" LIMIT ");
    qb.push_bind(filters.limit as i64);
    qb.push(" OFFSET ");
    qb.push_bind(filters.offset as i64);

    qb.build_query_as::<Job>().fetch_all(pool).await
}

pub async fn get_job_by_id(pool: &PgPool, id: i32) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Most recent easy-apply postings; the recommendation candidate pool.
pub async fn recent_easy_apply_jobs(pool: &PgPool, limit: i64) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE is_easy_apply ORDER BY posted_date DESC LIMIT $1")
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub async fn get_company_by_id(pool: &PgPool, id: i32) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn companies_by_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM companies WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub async fn jobs_by_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Decorates each job with its company record, null when the company row is
/// gone. Order of `jobs` is preserved.
pub fn attach_companies(jobs: Vec<Job>, companies: Vec<Company>) -> Vec<JobWithCompany> {
    let by_id: HashMap<i32, Company> = companies.into_iter().map(|c| (c.id, c)).collect();
    jobs.into_iter()
        .map(|job| {
            let company = job.company_id.and_then(|id| by_id.get(&id).cloned());
            JobWithCompany { job, company }
        })
        .collect()
}

/// One round trip for the page of jobs, one for their companies.
pub async fn with_companies(
    pool: &PgPool,
    jobs: Vec<Job>,
) -> Result<Vec<JobWithCompany>, sqlx::Error> {
    let mut ids: Vec<i32> = jobs.iter().filter_map(|j| j.company_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let companies = if ids.is_empty() {
        Vec::new()
    } else {
        companies_by_ids(pool, &ids).await?
    };
    Ok(attach_companies(jobs, companies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

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
            is_easy_apply: true,
            posted_date: Some(Utc::now()),
            url: "https://example.com/job".to_string(),
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
    fn test_attach_companies_preserves_order_and_nulls() {
        let jobs = vec![make_job(1, Some(10)), make_job(2, None), make_job(3, Some(99))];
        let companies = vec![make_company(10)];

        let decorated = attach_companies(jobs, companies);

        assert_eq!(decorated.len(), 3);
        assert_eq!(decorated[0].job.id, 1);
        assert_eq!(decorated[0].company.as_ref().unwrap().id, 10);
        // No company id at all, and a dangling company id, both yield null.
        assert!(decorated[1].company.is_none());
        assert!(decorated[2].company.is_none());
    }

    #[test]
    fn test_attach_companies_shares_one_company() {
        let jobs = vec![make_job(1, Some(7)), make_job(2, Some(7))];
        let decorated = attach_companies(jobs, vec![make_company(7)]);
        assert!(decorated.iter().all(|d| d.company.is_some()));
    }
}
