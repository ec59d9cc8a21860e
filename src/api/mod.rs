pub mod courses;
pub mod explore;
pub mod ratings;
pub mod session;
pub mod views;

use std::collections::HashMap;

use axum::http::{StatusCode, Uri};
use axum::routing::{get, patch, post};
use axum::Router;
use uuid::Uuid;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, AppError};
use crate::state::AppState;

pub type QueryMap = HashMap<String, String>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(courses::list_courses))
        .route("/courses/{id}", get(courses::course_detail))
        .route("/courses/{id}/ratings", post(ratings::create_rating))
        .route(
            "/courses/{id}/ratings/{rating_id}",
            patch(ratings::update_rating).delete(ratings::delete_rating),
        )
        .route("/ratings/{id}/vote", get(ratings::vote_state).put(ratings::cast_vote))
        .route("/my-ratings", get(ratings::my_ratings))
        .route("/filter-options", get(courses::filter_options))
        .route("/explore", get(explore::explore))
        .route("/session", get(session::current_session))
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        .route("/connection-error", get(session::connection_error))
        .route("/connection-error/retry", post(session::retry_connection))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Path and query of a page request, used as the return target after a
/// connection error.
pub fn page_path(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}

/// Page that owns a rating write; retrying lands back on the course.
pub fn course_page(course_id: Uuid) -> String {
    format!("/courses/{}", course_id)
}

/// Turns upstream connection failures into the connection-error redirect.
/// Other API errors are answered where they happened.
///
/// `return_to` must be a page (a GET route); write routes pass the page
/// they were submitted from.
pub trait UpstreamResult<T> {
    fn or_redirect(self, state: &AppState, return_to: &str) -> Result<T, AppError>;
}

impl<T> UpstreamResult<T> for Result<T, ApiError> {
    fn or_redirect(self, state: &AppState, return_to: &str) -> Result<T, AppError> {
        self.map_err(|err| {
            let Some(reason) = err.connection_reason() else {
                return AppError::Api(err);
            };
            match state.connection.begin_redirect(reason, return_to) {
                Some(location) => AppError::Redirect(location),
                None => AppError::Api(err),
            }
        })
    }
}
