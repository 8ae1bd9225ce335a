// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::domain::content::{Announcement, Resource, ScheduleEvent, Sponsor};
use handlers::content::{self, Collection};
use handlers::{
    admin, auth, connections, profile, registration, submissions, teammates, teams,
};
use state::AppState;

/// Builds the full route table over `state`
///
/// CORS and tracing layers are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(auth::health_check))
        // Identity and profile
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/api/profile/:id", get(profile::get_profile_by_id))
        // Registration
        .route("/api/registration", get(registration::status))
        .route("/api/registration/complete", post(registration::complete))
        .route(
            "/api/registration/confirm-devpost",
            post(registration::confirm_devpost),
        )
        // Teammates and connections
        .route("/api/teammates", get(teammates::list_teammates))
        .route(
            "/api/connections",
            get(connections::list).post(connections::send),
        )
        .route("/api/connections/incoming", get(connections::incoming))
        .route("/api/connections/outgoing", get(connections::outgoing))
        .route("/api/connections/:id/respond", post(connections::respond))
        // Teams
        .route("/api/teams", get(teams::list_teams).post(teams::create_team))
        .route("/api/teams/mine", get(teams::my_team))
        .route("/api/teams/leave", post(teams::leave_team))
        .route(
            "/api/teams/invitations",
            get(teams::my_invitations).post(teams::invite),
        )
        .route(
            "/api/teams/invitations/:id/respond",
            post(teams::respond_invitation),
        )
        .route(
            "/api/teams/:id",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        .route(
            "/api/teams/:id/members/:user_id",
            delete(teams::remove_member),
        )
        // Content collections
        .merge(collection_routes::<Resource>("/api/resources"))
        .route(
            "/api/announcements/public",
            get(content::list_public_announcements),
        )
        .merge(collection_routes::<Announcement>("/api/announcements"))
        .merge(collection_routes::<ScheduleEvent>("/api/schedule"))
        .merge(collection_routes::<Sponsor>("/api/sponsors"))
        // Submissions
        .route(
            "/api/submissions/mine",
            get(submissions::my_submission).put(submissions::upsert_submission),
        )
        .route("/api/submissions", get(submissions::list_submissions))
        // Admin
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/pending", get(admin::pending_approvals))
        .route("/api/admin/approve", post(admin::approve))
        .route("/api/admin/revoke", post(admin::revoke))
        .route("/api/admin/role", post(admin::set_role))
        .route("/api/admin/stats", get(admin::stats))
        .with_state(state)
}

fn collection_routes<T: Collection>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(content::list::<T>).post(content::create::<T>))
        .route(
            &format!("{}/:id", base),
            get(content::get::<T>)
                .put(content::update::<T>)
                .delete(content::delete::<T>),
        )
}
