//! Pluggable relevance scorer behind a trait object, so ranking backends can
//! be swapped without touching the handler. `AppState` carries an
//! `Arc<dyn JobScorer>`; the default counts shared skills.

use crate::models::job::Job;

pub trait JobScorer: Send + Sync {
    /// Relevance of `job` to a user with the given declared skills.
    fn score(&self, user_skills: &[String], job: &Job) -> u32;
}

/// Default scorer: the size of the intersection between the user's skill set
/// and the job's skill list. Exact string match, unweighted.
pub struct SkillOverlapScorer;

impl JobScorer for SkillOverlapScorer {
    fn score(&self, user_skills: &[String], job: &Job) -> u32 {
        job.skills
            .iter()
            .filter(|skill| user_skills.contains(skill))
            .count() as u32
    }
}
