// Job search: sparse optional filters composed into one query against
// jobs LEFT JOIN companies, paginated, newest postings first.

pub mod filters;
pub mod handlers;
pub mod store;
