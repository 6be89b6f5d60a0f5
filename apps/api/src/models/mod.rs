pub mod application;
pub mod company;
pub mod job;
pub mod profile;
pub mod resume;
pub mod search_criteria;
pub mod session;
pub mod user;
