pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{applications, auth, criteria, jobs, linkedin, profile, recommend, resumes};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handlers::handle_register))
        .route("/api/auth/login", post(auth::handlers::handle_login))
        .route("/api/auth/logout", post(auth::handlers::handle_logout))
        .route("/api/auth/status", get(auth::handlers::handle_status))
        // Profile
        .route(
            "/api/user/profile",
            get(profile::handlers::handle_get_profile)
                .put(profile::handlers::handle_update_profile),
        )
        // Resumes
        .route(
            "/api/resumes",
            get(resumes::handlers::handle_list_resumes)
                .post(resumes::handlers::handle_create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handlers::handle_get_resume)
                .put(resumes::handlers::handle_update_resume)
                .delete(resumes::handlers::handle_delete_resume),
        )
        // Jobs (public)
        .route("/api/jobs", get(jobs::handlers::handle_list_jobs))
        .route("/api/jobs/:id", get(jobs::handlers::handle_get_job))
        // Applications
        .route(
            "/api/applications",
            get(applications::handlers::handle_list_applications)
                .post(applications::handlers::handle_create_application),
        )
        .route(
            "/api/applications/recent",
            get(applications::handlers::handle_recent_applications),
        )
        .route(
            "/api/applications/:id",
            get(applications::handlers::handle_get_application)
                .put(applications::handlers::handle_update_application),
        )
        // Dashboard
        .route("/api/stats", get(applications::handlers::handle_stats))
        .route(
            "/api/recommended-jobs",
            get(recommend::handlers::handle_recommended_jobs),
        )
        // Saved search criteria
        .route(
            "/api/search-criteria",
            get(criteria::handlers::handle_list_criteria)
                .post(criteria::handlers::handle_create_criteria),
        )
        .route(
            "/api/search-criteria/:id",
            put(criteria::handlers::handle_update_criteria)
                .delete(criteria::handlers::handle_delete_criteria),
        )
        // External network stub
        .route(
            "/api/linkedin/connect",
            get(linkedin::handlers::handle_connect),
        )
        .route(
            "/api/linkedin/callback",
            get(linkedin::handlers::handle_callback),
        )
        .route(
            "/api/linkedin/disconnect",
            post(linkedin::handlers::handle_disconnect),
        )
        // Apply workflows
        .route("/api/apply", post(applications::handlers::handle_apply))
        .route(
            "/api/apply-batch",
            post(applications::handlers::handle_apply_batch),
        )
        .with_state(state)
}
