pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::{applications, jobs, messaging, profiles, recommendations, recruiter};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profiles
        .route(
            "/api/v1/profiles/:user_id",
            get(profiles::handlers::handle_get_profile)
                .patch(profiles::handlers::handle_update_profile),
        )
        .route(
            "/api/v1/profiles/:user_id/privacy",
            patch(profiles::handlers::handle_update_privacy),
        )
        .route(
            "/api/v1/profiles/:user_id/skills",
            put(profiles::handlers::handle_replace_skills),
        )
        .route(
            "/api/v1/profiles/:user_id/education",
            put(profiles::handlers::handle_replace_education),
        )
        .route(
            "/api/v1/profiles/:user_id/experience",
            put(profiles::handlers::handle_replace_experience),
        )
        .route(
            "/api/v1/profiles/:user_id/projects",
            put(profiles::handlers::handle_replace_projects),
        )
        .route(
            "/api/v1/profiles/:user_id/geocode",
            post(profiles::handlers::handle_geocode_profile),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handlers::handle_list_jobs).post(jobs::handlers::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handlers::handle_get_job).patch(jobs::handlers::handle_update_job),
        )
        .route(
            "/api/v1/jobs/:id/geocode",
            post(jobs::handlers::handle_geocode_job),
        )
        // Applications
        .route(
            "/api/v1/jobs/:job_id/apply",
            post(applications::handlers::handle_apply),
        )
        .route(
            "/api/v1/applications",
            get(applications::handlers::handle_my_applications),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handlers::handle_application_detail),
        )
        .route(
            "/api/v1/applications/:id/withdraw",
            post(applications::handlers::handle_withdraw),
        )
        .route(
            "/api/v1/applications/:id/status",
            post(applications::handlers::handle_update_status),
        )
        // Messaging
        .route(
            "/api/v1/messages",
            get(messaging::handlers::handle_inbox).post(messaging::handlers::handle_send_message),
        )
        .route(
            "/api/v1/messages/:id",
            get(messaging::handlers::handle_message_detail),
        )
        .route(
            "/api/v1/messages/:id/reply",
            post(messaging::handlers::handle_reply),
        )
        .route(
            "/api/v1/messages/:id/read",
            post(messaging::handlers::handle_mark_read),
        )
        // Recommendations
        .route(
            "/api/v1/jobs/:job_id/recommendations",
            get(recommendations::handlers::handle_job_recommendations),
        )
        .route(
            "/api/v1/jobs/:job_id/recommendations/refresh",
            post(recommendations::handlers::handle_refresh),
        )
        .route(
            "/api/v1/recommendations",
            get(recommendations::handlers::handle_all_recommendations),
        )
        .route(
            "/api/v1/recommendations/:id/viewed",
            post(recommendations::handlers::handle_mark_viewed),
        )
        .route(
            "/api/v1/recommendations/:id/status",
            post(recommendations::handlers::handle_update_status),
        )
        .route(
            "/api/v1/recommendations/:id/notes",
            patch(recommendations::handlers::handle_update_notes),
        )
        .route(
            "/api/v1/recommendations/:id/favorite",
            post(recommendations::handlers::handle_toggle_favorite),
        )
        // Recruiter workspace
        .route(
            "/api/v1/recruiter/dashboard",
            get(recruiter::handlers::handle_dashboard),
        )
        .route(
            "/api/v1/recruiter/applications",
            get(applications::handlers::handle_recruiter_applications),
        )
        .route(
            "/api/v1/recruiter/candidates",
            get(recruiter::handlers::handle_candidate_search),
        )
        .route(
            "/api/v1/recruiter/kanban/:job_id",
            get(recruiter::handlers::handle_board),
        )
        .route(
            "/api/v1/recruiter/kanban/stages",
            post(recruiter::handlers::handle_create_stage),
        )
        .route(
            "/api/v1/recruiter/kanban/move",
            post(recruiter::handlers::handle_move_card),
        )
        .with_state(state)
}
