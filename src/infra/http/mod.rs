mod admin;
mod auth;
mod middleware;
mod public;

pub use auth::AdminGate;
pub use public::HttpState;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    routing::get,
};

use crate::application::error::HttpError;
use crate::application::posts::PostError;
use crate::application::repos::RepoError;

use middleware::{log_responses, set_request_context};

/// Assemble the full router: public pages plus the admin subtree, with the
/// authorization gate applied before any admin handler runs.
pub fn build_router(state: HttpState, gate: AdminGate) -> Router {
    let admin_routes = Router::new()
        .route("/posts/admin", get(admin::admin_posts))
        .route(
            "/posts/admin/{slug}",
            get(admin::admin_editor).post(admin::admin_submit),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            gate,
            auth::require_admin,
        ));

    let public_routes = Router::new()
        .route("/posts", get(public::posts_index))
        .route("/posts/{slug}", get(public::post_detail));

    admin_routes
        .merge(public_routes)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

/// Map service errors that escape form handling to transport responses.
pub fn post_error_to_http(source: &'static str, err: PostError) -> HttpError {
    match err {
        PostError::NotFound { slug } => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Post not found",
            format!("no post stored under slug `{slug}`"),
        ),
        PostError::SlugTaken { slug } => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Slug already in use",
            format!("slug `{slug}` is already in use"),
        ),
        PostError::Invalid(_) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Request could not be processed",
            "post fields failed validation",
        ),
        PostError::Repo(repo) => repo_error_to_http(source, repo),
    }
}

fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    match err {
        RepoError::Duplicate { constraint } => {
            HttpError::new(source, StatusCode::CONFLICT, "Duplicate record", constraint)
        }
        RepoError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            "resource not found",
        ),
        RepoError::Integrity { message } => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Integrity constraint violated",
            message,
        ),
        RepoError::Timeout => HttpError::new(
            source,
            StatusCode::SERVICE_UNAVAILABLE,
            "Database timeout",
            "Database timeout",
        ),
        RepoError::Persistence(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    }
}
