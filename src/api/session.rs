use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{info, warn};

use super::views::ConnectionErrorPage;
use super::{QueryMap, UpstreamResult, page_path};
use crate::client::ConnectionErrorReason;
use crate::client::connection::{FALLBACK_RETURN_PATH, sanitize_return_path};
use crate::error::{ApiError, AppError};
use crate::models::{LoginRequest, Session};
use crate::state::AppState;

pub async fn current_session(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Session>, AppError> {
    let session = state.api.session().await.or_redirect(&state, page_path(&uri))?;
    Ok(Json(session))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Session>, AppError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("username and password are required".to_string()));
    }
    let session = state.api.login(&req).await.or_redirect(&state, FALLBACK_RETURN_PATH)?;
    info!("logged in as {}", req.username.trim());
    Ok(Json(session))
}

pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.api.logout().await.or_redirect(&state, FALLBACK_RETURN_PATH)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn connection_error(Query(query): Query<QueryMap>) -> Json<ConnectionErrorPage> {
    let reason = query
        .get("reason")
        .map(|r| ConnectionErrorReason::parse(r))
        .unwrap_or_default();
    let from = sanitize_return_path(query.get("from").map(String::as_str));
    Json(ConnectionErrorPage::new(reason, from))
}

/// Manual retry: a cheap session probe decides whether the API is back.
/// Any HTTP answer, even 401/403, means it is reachable.
pub async fn retry_connection(
    State(state): State<AppState>,
    Query(query): Query<QueryMap>,
) -> Result<Response, AppError> {
    let from = sanitize_return_path(query.get("from").map(String::as_str));

    match state.api.session().await {
        Ok(_) | Err(ApiError::Status { .. }) => {
            info!("connection restored, returning to {}", from);
            state.connection.reset();
            Ok(Redirect::to(&from).into_response())
        }
        Err(err) => {
            warn!("connection retry failed: {}", err);
            let reason = err.connection_reason().unwrap_or_default();
            Ok((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ConnectionErrorPage::new(reason, from)),
            )
                .into_response())
        }
    }
}
