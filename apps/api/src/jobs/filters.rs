//! Filter composition for the job search endpoint.
//!
//! Each present field contributes one predicate; absent fields contribute
//! nothing. The predicates AND together, so an empty filter set matches
//! every job.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::models::job::{ExperienceLevel, JobType};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Relative posting-date window. Unrecognized strings parse to `None` and
/// impose no lower bound, matching `datePosted` values saved in search
/// criteria rows from older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    Day,
    Week,
    Month,
}

impl DateWindow {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "day" => Some(DateWindow::Day),
            "week" => Some(DateWindow::Week),
            "month" => Some(DateWindow::Month),
            _ => None,
        }
    }

    /// The oldest posting date still inside the window, relative to `now`.
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            DateWindow::Day => 1,
            DateWindow::Week => 7,
            DateWindow::Month => 30,
        };
        now - Duration::days(days)
    }
}

/// Raw query parameters as they arrive on `GET /api/jobs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsQuery {
    pub title: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub job_type: Option<JobType>,
    pub is_easy_apply: Option<bool>,
    pub date_posted: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Validated, typed filter set handed to the storage layer.
#[derive(Debug, Default)]
pub struct JobFilters {
    pub title: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub job_type: Option<JobType>,
    pub is_easy_apply: Option<bool>,
    pub posted_window: Option<DateWindow>,
    pub limit: u32,
    pub offset: u32,
}

impl JobFilters {
    pub fn from_query(query: JobsQuery) -> Self {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = query.page.unwrap_or(1).max(1);
        JobFilters {
            title: query.title,
            location: query.location,
            experience_level: query.experience_level,
            job_type: query.job_type,
            is_easy_apply: query.is_easy_apply,
            posted_window: query.date_posted.as_deref().and_then(DateWindow::parse),
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_cutoffs() {
        let now = fixed_now();
        assert_eq!(DateWindow::Day.cutoff(now), now - Duration::days(1));
        assert_eq!(DateWindow::Week.cutoff(now), now - Duration::days(7));
        assert_eq!(DateWindow::Month.cutoff(now), now - Duration::days(30));
    }

    #[test]
    fn test_week_window_bounds() {
        // Eight days ago falls outside, one day ago inside.
        let now = fixed_now();
        let cutoff = DateWindow::Week.cutoff(now);
        assert!(now - Duration::days(8) < cutoff);
        assert!(now - Duration::days(1) >= cutoff);
    }

    #[test]
    fn test_unknown_window_parses_to_none() {
        assert_eq!(DateWindow::parse("fortnight"), None);
        assert_eq!(DateWindow::parse(""), None);
        assert_eq!(DateWindow::parse("week"), Some(DateWindow::Week));
    }

    #[test]
    fn test_pagination_offset() {
        let filters = JobFilters::from_query(JobsQuery {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        });
        assert_eq!(filters.limit, 20);
        assert_eq!(filters.offset, 40);
    }

    #[test]
    fn test_pagination_defaults() {
        let filters = JobFilters::from_query(JobsQuery::default());
        assert_eq!(filters.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(filters.offset, 0);
    }

    #[test]
    fn test_extreme_pagination_saturates() {
        let filters = JobFilters::from_query(JobsQuery {
            page: Some(u32::MAX),
            limit: Some(u32::MAX),
            ..Default::default()
        });
        assert_eq!(filters.limit, MAX_PAGE_SIZE);
        assert_eq!(filters.offset, u32::MAX);
    }

    #[test]
    fn test_limit_clamps_to_maximum() {
        let filters = JobFilters::from_query(JobsQuery {
            limit: Some(5000),
            ..Default::default()
        });
        assert_eq!(filters.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_zero_clamps_to_first_page() {
        let filters = JobFilters::from_query(JobsQuery {
            page: Some(0),
            ..Default::default()
        });
        assert_eq!(filters.offset, 0);
    }
}
