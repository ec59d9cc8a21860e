#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use coursescope::client::{ConnectionErrorReason, CourseApi};
use coursescope::error::ApiError;
use coursescope::filters::CourseListQuery;
use coursescope::models::{
    Course, CourseAnalytics, CourseDetail, CourseStatus, FilterOptions, LoginRequest, Page,
    Rating, RatingPayload, Session, StudentRating, VoteType,
};
use coursescope::table::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Offline,
    Server,
    Status(u16),
}

impl Failure {
    fn to_error(self) -> ApiError {
        match self {
            Failure::Offline => ApiError::Connection {
                reason: ConnectionErrorReason::Offline,
                message: "connection refused".to_string(),
            },
            Failure::Server => ApiError::Connection {
                reason: ConnectionErrorReason::Server,
                message: "502 Bad Gateway".to_string(),
            },
            Failure::Status(status) => ApiError::Status {
                status,
                body: "{\"detail\":\"nope\"}".to_string(),
            },
        }
    }
}

/// In-memory `CourseApi` that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub courses: Mutex<Vec<Course>>,
    pub analytics: Mutex<Vec<CourseAnalytics>>,
    pub ratings: Mutex<Vec<Rating>>,
    pub failure: Mutex<Option<Failure>>,
    pub vote_failure: Mutex<Option<Failure>>,
    pub vote_latency: Mutex<Duration>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, failure: Option<Failure>) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn fail_votes_with(&self, failure: Option<Failure>) {
        *self.vote_failure.lock().unwrap() = failure;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn slow_votes_by(&self, latency: Duration) {
        *self.vote_latency.lock().unwrap() = latency;
    }

    async fn vote_latency(&self) {
        let latency = *self.vote_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match *self.failure.lock().unwrap() {
            Some(f) => Err(f.to_error()),
            None => Ok(()),
        }
    }

    fn record_vote(&self, call: String) -> Result<(), ApiError> {
        self.record(call)?;
        match *self.vote_failure.lock().unwrap() {
            Some(f) => Err(f.to_error()),
            None => Ok(()),
        }
    }
}

pub fn course(title: &str, difficulty: Option<f64>, usefulness: Option<f64>, count: u32) -> Course {
    Course {
        id: Uuid::new_v4(),
        title: title.to_string(),
        faculty_name: "Факультет інформатики".to_string(),
        department_name: "Кафедра математики".to_string(),
        avg_difficulty: difficulty,
        avg_usefulness: usefulness,
        ratings_count: count,
        status: CourseStatus::Active,
        specialities: Vec::new(),
    }
}

pub fn rating(upvotes: u32, downvotes: u32, viewer_vote: Option<VoteType>) -> Rating {
    Rating {
        id: Uuid::new_v4(),
        difficulty: 3,
        usefulness: 4,
        comment: Some("Корисний курс".to_string()),
        is_anonymous: false,
        created_at: Utc::now(),
        upvotes,
        downvotes,
        viewer_vote,
    }
}

pub fn analytics_row(name: &str, usefulness: f64, difficulty: f64, count: u32) -> CourseAnalytics {
    CourseAnalytics {
        id: Uuid::new_v4(),
        name: name.to_string(),
        faculty_name: "ФІ".to_string(),
        avg_difficulty: Some(difficulty),
        avg_usefulness: Some(usefulness),
        ratings_count: count,
    }
}

fn page_of<T: Clone>(items: &[T], pagination: Pagination) -> Page<T> {
    let size = pagination.page_size.max(1) as usize;
    let start = (pagination.page.saturating_sub(1) as usize) * size;
    Page {
        count: items.len() as u64,
        page: pagination.page,
        page_size: pagination.page_size,
        total_pages: items.len().div_ceil(size) as u32,
        results: items.iter().skip(start).take(size).cloned().collect(),
    }
}

#[async_trait]
impl CourseApi for FakeApi {
    async fn list_courses(&self, query: &CourseListQuery) -> Result<Page<Course>, ApiError> {
        let pairs: Vec<String> = query.to_pairs().into_iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.record(format!("list_courses {}", pairs.join("&")))?;
        let pagination = Pagination {
            page: query.page.unwrap_or(1),
            page_size: query.page_size.unwrap_or(20),
        };
        Ok(page_of(&self.courses.lock().unwrap(), pagination))
    }

    async fn get_course(&self, id: Uuid) -> Result<CourseDetail, ApiError> {
        self.record(format!("get_course {id}"))?;
        let course = self
            .courses
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                body: "not found".to_string(),
            })?;
        Ok(CourseDetail {
            course,
            description: Some("Опис курсу".to_string()),
            instructors: vec!["Іван Петренко".to_string()],
        })
    }

    async fn course_analytics(&self, query: &CourseListQuery) -> Result<Vec<CourseAnalytics>, ApiError> {
        self.record(format!("course_analytics {}", query.to_pairs().len()))?;
        Ok(self.analytics.lock().unwrap().clone())
    }

    async fn list_course_ratings(&self, course_id: Uuid, pagination: Pagination) -> Result<Page<Rating>, ApiError> {
        self.record(format!("list_course_ratings {course_id} {}", pagination.page))?;
        Ok(page_of(&self.ratings.lock().unwrap(), pagination))
    }

    async fn create_rating(&self, course_id: Uuid, payload: &RatingPayload) -> Result<Rating, ApiError> {
        self.record(format!("create_rating {course_id}"))?;
        let mut created = rating(0, 0, None);
        created.difficulty = payload.difficulty;
        created.usefulness = payload.usefulness;
        created.comment = payload.comment.clone();
        created.is_anonymous = payload.is_anonymous;
        Ok(created)
    }

    async fn update_rating(&self, course_id: Uuid, rating_id: Uuid, payload: &RatingPayload) -> Result<Rating, ApiError> {
        self.record(format!("update_rating {course_id} {rating_id}"))?;
        let mut updated = rating(0, 0, None);
        updated.id = rating_id;
        updated.difficulty = payload.difficulty;
        updated.usefulness = payload.usefulness;
        Ok(updated)
    }

    async fn delete_rating(&self, course_id: Uuid, rating_id: Uuid) -> Result<(), ApiError> {
        self.record(format!("delete_rating {course_id} {rating_id}"))
    }

    async fn upsert_vote(&self, rating_id: Uuid, vote: VoteType) -> Result<(), ApiError> {
        self.vote_latency().await;
        self.record_vote(format!("upsert_vote {rating_id} {vote:?}"))
    }

    async fn delete_vote(&self, rating_id: Uuid) -> Result<(), ApiError> {
        self.vote_latency().await;
        self.record_vote(format!("delete_vote {rating_id}"))
    }

    async fn my_ratings(&self) -> Result<Vec<StudentRating>, ApiError> {
        self.record("my_ratings".to_string())?;
        Ok(Vec::new())
    }

    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        self.record("filter_options".to_string())?;
        Ok(FilterOptions::default())
    }

    async fn session(&self) -> Result<Session, ApiError> {
        self.record("session".to_string())?;
        Ok(Session {
            is_authenticated: false,
            user: None,
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        self.record(format!("login {}", request.username))?;
        Ok(Session {
            is_authenticated: true,
            user: None,
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout".to_string())
    }
}
