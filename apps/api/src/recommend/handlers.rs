use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::jobs::store as jobs_store;
use crate::profile::store as profile_store;
use crate::recommend::{rank_candidates, RecommendedJob};
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 3;
const MAX_LIMIT: usize = 100;

/// Candidate pool multiplier. Bounds query cost at the price of never seeing
/// matches outside the most recent postings.
const POOL_FACTOR: usize = 3;

/// Scoring needs a wider pool than the requested page; without skills the
/// ranking is pure recency and the pool can match the limit exactly.
fn candidate_pool_size(limit: usize, has_skills: bool) -> usize {
    if has_skills {
        limit.saturating_mul(POOL_FACTOR)
    } else {
        limit
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub limit: Option<usize>,
}

/// GET /api/recommended-jobs
///
/// Easy-apply jobs ranked by overlap with the caller's declared skills.
/// Without a profile (or with no skills) this degrades to plain recency.
pub async fn handle_recommended_jobs(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
    auth: AuthUser,
) -> Result<Json<Vec<RecommendedJob>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let skills = profile_store::get_profile_by_user_id(&state.db, auth.user.id)
        .await?
        .map(|profile| profile.skills)
        .unwrap_or_default();

    let pool_size = candidate_pool_size(limit, !skills.is_empty());
    let jobs = jobs_store::recent_easy_apply_jobs(&state.db, pool_size as i64).await?;
    let candidates = jobs_store::with_companies(&state.db, jobs).await?;

    Ok(Json(rank_candidates(
        &state.scorer,
        &skills,
        candidates,
        limit,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_widens_only_with_skills() {
        assert_eq!(candidate_pool_size(3, true), 9);
        assert_eq!(candidate_pool_size(3, false), 3);
    }

    #[test]
    fn test_pool_size_saturates_at_usize_max() {
        assert_eq!(candidate_pool_size(usize::MAX, true), usize::MAX);
    }
}
