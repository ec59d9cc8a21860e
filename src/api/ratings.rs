use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{UpstreamResult, course_page, page_path};
use super::views::MyRatingsPage;
use crate::error::AppError;
use crate::models::{Rating, RatingForm, VoteType};
use crate::state::AppState;
use crate::votes::VoteState;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote: Option<VoteType>,
}

pub async fn create_rating(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(form): Json<RatingForm>,
) -> Result<(StatusCode, Json<Rating>), AppError> {
    let payload = form.validate().map_err(AppError::Validation)?;
    let rating = state
        .api
        .create_rating(course_id, &payload)
        .await
        .or_redirect(&state, &course_page(course_id))?;
    info!("rating {} created for course {}", rating.id, course_id);
    Ok((StatusCode::CREATED, Json(rating)))
}

pub async fn update_rating(
    State(state): State<AppState>,
    Path((course_id, rating_id)): Path<(Uuid, Uuid)>,
    Json(form): Json<RatingForm>,
) -> Result<Json<Rating>, AppError> {
    let payload = form.validate().map_err(AppError::Validation)?;
    let rating = state
        .api
        .update_rating(course_id, rating_id, &payload)
        .await
        .or_redirect(&state, &course_page(course_id))?;
    Ok(Json(rating))
}

pub async fn delete_rating(
    State(state): State<AppState>,
    Path((course_id, rating_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .api
        .delete_rating(course_id, rating_id)
        .await
        .or_redirect(&state, &course_page(course_id))?;
    info!("rating {} deleted from course {}", rating_id, course_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Applies the vote locally and answers right away; the API write follows
/// once the user stops clicking.
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(rating_id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> Result<(StatusCode, Json<VoteState>), AppError> {
    let sync = state.votes.get(rating_id).ok_or(AppError::NotFound)?;
    let (optimistic, _pending) = sync.select(req.vote);
    Ok((StatusCode::ACCEPTED, Json(optimistic)))
}

pub async fn vote_state(
    State(state): State<AppState>,
    Path(rating_id): Path<Uuid>,
) -> Result<Json<VoteState>, AppError> {
    let sync = state.votes.get(rating_id).ok_or(AppError::NotFound)?;
    Ok(Json(sync.state()))
}

pub async fn my_ratings(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<MyRatingsPage>, AppError> {
    let ratings = state.api.my_ratings().await.or_redirect(&state, page_path(&uri))?;
    Ok(Json(MyRatingsPage {
        count: ratings.len(),
        ratings,
    }))
}
