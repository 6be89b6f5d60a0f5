use serde::Serialize;
use sqlx::PgPool;

use crate::applications::store;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total_applications: i64,
    pub responses_received: i64,
    pub interviews_scheduled: i64,
    /// Interviews as a percentage of total, rounded. 0 for an empty history.
    pub success_rate: i64,
}

impl ApplicationStats {
    pub fn compute(total: i64, responses: i64, interviews: i64) -> Self {
        let success_rate = if total > 0 {
            ((interviews as f64 / total as f64) * 100.0).round() as i64
        } else {
            0
        };
        ApplicationStats {
            total_applications: total,
            responses_received: responses,
            interviews_scheduled: interviews,
            success_rate,
        }
    }
}

pub async fn stats_for_user(pool: &PgPool, user_id: i32) -> Result<ApplicationStats, sqlx::Error> {
    let total = store::count_applications(pool, user_id).await?;
    let responses = store::count_responses(pool, user_id).await?;
    let interviews = store::count_interviews(pool, user_id).await?;
    Ok(ApplicationStats::compute(total, responses, interviews))
}
