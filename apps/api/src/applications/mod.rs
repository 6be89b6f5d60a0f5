// Application pipeline: CRUD over job_applications, derived statistics,
// and the single/batch apply workflows.

pub mod apply;
pub mod handlers;
pub mod stats;
pub mod store;
