pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(handlers::handle_list_jobs).post(handlers::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(handlers::handle_get_job)
                .patch(handlers::handle_update_job)
                .delete(handlers::handle_delete_job),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list_resumes).post(handlers::handle_create_resume),
        )
        .route("/api/v1/resumes/upload", post(handlers::handle_upload_resume))
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get_resume).delete(handlers::handle_delete_resume),
        )
        // Matching
        .route("/api/v1/jobs/:id/match", post(handlers::handle_match_job))
        .route("/api/v1/jobs/:id/matches", get(handlers::handle_list_matches))
        .with_state(state)
}
