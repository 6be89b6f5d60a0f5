//! Single and batch apply.
//!
//! The single path is all-or-nothing; the batch path runs the same steps per
//! job id and reports per-item outcomes, so one bad id never sinks the rest.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;

use crate::applications::store::{self, NewApplication};
use crate::jobs::store as jobs_store;
use crate::models::application::{ApplicationStatus, JobApplication};
use crate::resumes::store as resumes_store;

/// Storage surface the apply pipeline runs against. The pipeline only needs
/// these three calls, and taking them as a trait lets the step ordering be
/// checked without a database.
#[async_trait]
pub trait ApplyStore: Sync {
    async fn job_exists(&self, job_id: i32) -> Result<bool, sqlx::Error>;
    async fn already_applied(&self, user_id: i32, job_id: i32) -> Result<bool, sqlx::Error>;
    async fn record_application(
        &self,
        new: NewApplication<'_>,
    ) -> Result<JobApplication, sqlx::Error>;
}

#[async_trait]
impl ApplyStore for PgPool {
    async fn job_exists(&self, job_id: i32) -> Result<bool, sqlx::Error> {
        Ok(jobs_store::get_job_by_id(self, job_id).await?.is_some())
    }

    async fn already_applied(&self, user_id: i32, job_id: i32) -> Result<bool, sqlx::Error> {
        store::application_exists(self, user_id, job_id).await
    }

    async fn record_application(
        &self,
        new: NewApplication<'_>,
    ) -> Result<JobApplication, sqlx::Error> {
        store::insert_application(self, new).await
    }
}

pub const BATCH_NOTES: &str = "Applied via batch auto-apply";

/// Per-job result of one apply attempt.
#[derive(Debug)]
pub enum ApplyOutcome {
    Applied(JobApplication),
    JobNotFound,
    AlreadyApplied,
}

/// One entry in the batch response. The outer request always succeeds;
/// failures are data here, not errors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub job_id: i32,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BatchItemResult {
    pub fn from_outcome(job_id: i32, outcome: ApplyOutcome) -> Self {
        match outcome {
            ApplyOutcome::Applied(application) => BatchItemResult {
                job_id,
                success: true,
                application_id: Some(application.id),
                message: None,
            },
            ApplyOutcome::JobNotFound => BatchItemResult {
                job_id,
                success: false,
                application_id: None,
                message: Some("Job not found".to_string()),
            },
            ApplyOutcome::AlreadyApplied => BatchItemResult {
                job_id,
                success: false,
                application_id: None,
                message: Some("Already applied".to_string()),
            },
        }
    }

    pub fn failed(job_id: i32) -> Self {
        BatchItemResult {
            job_id,
            success: false,
            application_id: None,
            message: Some("Failed to apply".to_string()),
        }
    }
}

/// Resolves the resume an application should carry: the explicit id when
/// given, else the caller's default resume, else none.
pub async fn resolve_resume_id(
    pool: &PgPool,
    user_id: i32,
    explicit: Option<i32>,
) -> Result<Option<i32>, sqlx::Error> {
    if explicit.is_some() {
        return Ok(explicit);
    }
    let default = resumes_store::get_default_resume_by_user_id(pool, user_id).await?;
    Ok(default.map(|resume| resume.id))
}

/// Applies one user to one job. The duplicate check queries storage at call
/// time, so within a batch an id applied by an earlier iteration is caught
/// when it comes up again.
pub async fn apply_to_job<S: ApplyStore + ?Sized>(
    storage: &S,
    user_id: i32,
    job_id: i32,
    resume_id: Option<i32>,
    notes: Option<&str>,
) -> Result<ApplyOutcome, sqlx::Error> {
    if !storage.job_exists(job_id).await? {
        return Ok(ApplyOutcome::JobNotFound);
    }

    if storage.already_applied(user_id, job_id).await? {
        return Ok(ApplyOutcome::AlreadyApplied);
    }

    let application = storage
        .record_application(NewApplication {
            user_id,
            job_id,
            resume_id,
            status: ApplicationStatus::Applied,
            notes,
        })
        .await?;

    Ok(ApplyOutcome::Applied(application))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

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

    struct FakeStore {
        jobs: Vec<i32>,
        applied: Mutex<Vec<(i32, i32)>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeStore {
        fn with_jobs(jobs: Vec<i32>) -> Self {
            FakeStore {
                jobs,
                applied: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApplyStore for FakeStore {
        async fn job_exists(&self, job_id: i32) -> Result<bool, sqlx::Error> {
            self.calls.lock().unwrap().push("job_exists");
            Ok(self.jobs.contains(&job_id))
        }

        async fn already_applied(&self, user_id: i32, job_id: i32) -> Result<bool, sqlx::Error> {
            self.calls.lock().unwrap().push("already_applied");
            Ok(self.applied.lock().unwrap().contains(&(user_id, job_id)))
        }

        async fn record_application(
            &self,
            new: NewApplication<'_>,
        ) -> Result<JobApplication, sqlx::Error> {
            self.calls.lock().unwrap().push("record_application");
            let mut applied = self.applied.lock().unwrap();
            applied.push((new.user_id, new.job_id));
            let mut application = make_application(applied.len() as i32, new.job_id);
            application.user_id = new.user_id;
            application.resume_id = new.resume_id;
            Ok(application)
        }
    }

    #[tokio::test]
    async fn test_duplicate_stops_before_insert() {
        let storage = FakeStore::with_jobs(vec![7]);
        storage.applied.lock().unwrap().push((1, 7));

        let outcome = apply_to_job(&storage, 1, 7, None, None).await.unwrap();
        assert!(matches!(outcome, ApplyOutcome::AlreadyApplied));
        assert_eq!(storage.calls(), vec!["job_exists", "already_applied"]);
    }

    #[tokio::test]
    async fn test_unknown_job_short_circuits() {
        let storage = FakeStore::with_jobs(vec![7]);

        let outcome = apply_to_job(&storage, 1, 99, None, None).await.unwrap();
        assert!(matches!(outcome, ApplyOutcome::JobNotFound));
        assert_eq!(storage.calls(), vec!["job_exists"]);
    }

    #[tokio::test]
    async fn test_repeated_id_caught_on_second_pass() {
        // The batch loop re-checks storage per item, so an id applied by an
        // earlier iteration comes back AlreadyApplied, not a second row.
        let storage = FakeStore::with_jobs(vec![7]);

        let first = apply_to_job(&storage, 1, 7, None, None).await.unwrap();
        assert!(matches!(first, ApplyOutcome::Applied(_)));

        let second = apply_to_job(&storage, 1, 7, None, None).await.unwrap();
        assert!(matches!(second, ApplyOutcome::AlreadyApplied));
        assert_eq!(storage.applied.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_applied_outcome_carries_new_id() {
        let item =
            BatchItemResult::from_outcome(7, ApplyOutcome::Applied(make_application(42, 7)));
        assert!(item.success);
        assert_eq!(item.application_id, Some(42));
        assert!(item.message.is_none());
    }

    #[test]
    fn test_failure_outcomes_carry_reasons() {
        let not_found = BatchItemResult::from_outcome(7, ApplyOutcome::JobNotFound);
        assert!(!not_found.success);
        assert_eq!(not_found.message.as_deref(), Some("Job not found"));

        let duplicate = BatchItemResult::from_outcome(7, ApplyOutcome::AlreadyApplied);
        assert!(!duplicate.success);
        assert_eq!(duplicate.message.as_deref(), Some("Already applied"));
    }

    #[test]
    fn test_batch_item_serializes_without_null_noise() {
        let item = BatchItemResult::from_outcome(7, ApplyOutcome::AlreadyApplied);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["jobId"], 7);
        assert_eq!(value["success"], false);
        assert!(value.get("applicationId").is_none());
    }
}
