use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use uuid::Uuid;

use super::views::{
    CourseDetailPage, CourseRow, CoursesPage, PaginationView, RatingView, SortHeaderView,
};
use super::{QueryMap, UpstreamResult, page_path};
use crate::error::AppError;
use crate::filters::ListParams;
use crate::models::FilterOptions;
use crate::state::AppState;

pub async fn list_courses(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<QueryMap>,
) -> Result<Json<CoursesPage>, AppError> {
    let params = ListParams::from_url_params(&query);
    let api_query = params
        .filters
        .to_api_query(Some(params.pagination), &params.sort);

    let page = state.api.list_courses(&api_query).await.or_redirect(&state, page_path(&uri))?;

    Ok(Json(CoursesPage {
        query_string: params.to_query_string(),
        active_filters: params.filters.active_count(),
        rows: page.results.iter().map(CourseRow::from).collect(),
        sort_headers: SortHeaderView::for_list(&params),
        pagination: PaginationView::from_page(&page),
        params,
    }))
}

pub async fn course_detail(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<Uuid>,
    Query(query): Query<QueryMap>,
) -> Result<Json<CourseDetailPage>, AppError> {
    let detail = state.api.get_course(id).await.or_redirect(&state, page_path(&uri))?;

    // only page/size matter here
    let pagination = ListParams::from_url_params(&query).pagination;
    let ratings = state
        .api
        .list_course_ratings(id, pagination)
        .await
        .or_redirect(&state, page_path(&uri))?;

    let views = ratings
        .results
        .iter()
        .map(|rating| RatingView::new(rating, state.votes.track(rating).state()))
        .collect();

    Ok(Json(CourseDetailPage {
        course: CourseRow::from(&detail.course),
        description: detail.description,
        instructors: detail.instructors,
        ratings: views,
        ratings_pagination: PaginationView::from_page(&ratings),
    }))
}

pub async fn filter_options(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<FilterOptions>, AppError> {
    let options = state.api.filter_options().await.or_redirect(&state, page_path(&uri))?;
    Ok(Json(options))
}
