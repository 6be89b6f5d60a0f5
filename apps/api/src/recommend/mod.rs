// Recommended jobs: a bounded candidate pool of recent easy-apply postings
// ranked by skill overlap with the caller's profile.

pub mod handlers;
pub mod scorer;

use std::cmp::Reverse;
use std::sync::Arc;

use serde::Serialize;

use crate::models::company::Company;
use crate::models::job::{Job, JobWithCompany};

use self::scorer::JobScorer;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedJob {
    pub job: Job,
    pub company: Option<Company>,
    pub score: u32,
}

/// Ranks candidates by score, highest first, and truncates to `limit`.
///
/// The sort is stable, so candidates with equal scores keep their incoming
/// recency order. The pool is whatever the caller fetched (limit × 3 recent
/// easy-apply jobs); better matches outside it are never considered — that
/// windowing is a deliberate cost bound, not an accident.
pub fn rank_candidates(
    scorer: &Arc<dyn JobScorer>,
    user_skills: &[String],
    candidates: Vec<JobWithCompany>,
    limit: usize,
) -> Vec<RecommendedJob> {
    let mut scored: Vec<RecommendedJob> = candidates
        .into_iter()
        .map(|candidate| {
            let score = scorer.score(user_skills, &candidate.job);
            RecommendedJob {
                job: candidate.job,
                company: candidate.company,
                score,
            }
        })
        .collect();
    scored.sort_by_key(|r| Reverse(r.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::scorer::SkillOverlapScorer;
    use super::*;
    use chrono::Utc;

    fn make_candidate(id: i32, skills: &[&str]) -> JobWithCompany {
        JobWithCompany {
            job: Job {
                id,
                linkedin_job_id: None,
                title: format!("Job {id}"),
                company_id: None,
                description: None,
                location: None,
                salary: None,
                job_type: None,
                experience_level: None,
                skills: skills.iter().map(|s| s.to_string()).collect(),
                is_easy_apply: true,
                posted_date: Some(Utc::now()),
                url: "https://example.com".to_string(),
                created_at: Utc::now(),
            },
            company: None,
        }
    }

    fn scorer() -> Arc<dyn JobScorer> {
        Arc::new(SkillOverlapScorer)
    }

    #[test]
    fn test_ranking_is_stable_among_ties() {
        // Candidate pool in recency order with overlap counts [2, 1, 0, 2]
        // against skills {React, SQL}: both 2s first (original order kept),
        // then the 1, then the 0.
        let user_skills = vec!["React".to_string(), "SQL".to_string()];
        let candidates = vec![
            make_candidate(1, &["React", "SQL"]),
            make_candidate(2, &["React"]),
            make_candidate(3, &["Haskell"]),
            make_candidate(4, &["SQL", "React", "Go"]),
        ];

        let ranked = rank_candidates(&scorer(), &user_skills, candidates, 10);

        let ids: Vec<i32> = ranked.iter().map(|r| r.job.id).collect();
        assert_eq!(ids, vec![1, 4, 2, 3]);
        let scores: Vec<u32> = ranked.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![2, 2, 1, 0]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let user_skills = vec!["React".to_string()];
        let candidates = vec![
            make_candidate(1, &[]),
            make_candidate(2, &["React"]),
            make_candidate(3, &[]),
        ];
        let ranked = rank_candidates(&scorer(), &user_skills, candidates, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].job.id, 2);
    }

    #[test]
    fn test_empty_skills_keeps_recency_order() {
        let candidates = vec![
            make_candidate(5, &["A"]),
            make_candidate(6, &["B"]),
            make_candidate(7, &[]),
        ];
        let ranked = rank_candidates(&scorer(), &[], candidates, 3);
        let ids: Vec<i32> = ranked.iter().map(|r| r.job.id).collect();
        assert_eq!(ids, vec![5, 6, 7]);
        assert!(ranked.iter().all(|r| r.score == 0));
    }
}
