pub mod connection;
pub mod http;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::filters::CourseListQuery;
use crate::models::{
    Course, CourseAnalytics, CourseDetail, FilterOptions, LoginRequest, Page, Rating,
    RatingPayload, Session, StudentRating, VoteType,
};
use crate::table::Pagination;

pub use connection::{ConnectionErrorReason, ConnectionMonitor};
pub use http::{ApiConfig, HttpCourseApi};

/// The upstream course REST API.
#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn list_courses(&self, query: &CourseListQuery) -> Result<Page<Course>, ApiError>;
    async fn get_course(&self, id: Uuid) -> Result<CourseDetail, ApiError>;
    async fn course_analytics(
        &self,
        query: &CourseListQuery,
    ) -> Result<Vec<CourseAnalytics>, ApiError>;

    async fn list_course_ratings(
        &self,
        course_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<Rating>, ApiError>;
    async fn create_rating(
        &self,
        course_id: Uuid,
        payload: &RatingPayload,
    ) -> Result<Rating, ApiError>;
    async fn update_rating(
        &self,
        course_id: Uuid,
        rating_id: Uuid,
        payload: &RatingPayload,
    ) -> Result<Rating, ApiError>;
    async fn delete_rating(&self, course_id: Uuid, rating_id: Uuid) -> Result<(), ApiError>;

    async fn upsert_vote(&self, rating_id: Uuid, vote: VoteType) -> Result<(), ApiError>;
    async fn delete_vote(&self, rating_id: Uuid) -> Result<(), ApiError>;

    async fn my_ratings(&self) -> Result<Vec<StudentRating>, ApiError>;
    async fn filter_options(&self) -> Result<FilterOptions, ApiError>;

    async fn session(&self) -> Result<Session, ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
}
