use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use super::CourseApi;
use super::connection::ConnectionErrorReason;
use crate::error::ApiError;
use crate::filters::CourseListQuery;
use crate::models::{
    Course, CourseAnalytics, CourseDetail, FilterOptions, LoginRequest, Page, Rating,
    RatingPayload, Session, StudentRating, VoteType,
};
use crate::table::Pagination;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// reqwest-backed [`CourseApi`]. Cookies persist across requests so the
/// API session and CSRF token survive; unsafe methods echo the CSRF cookie
/// back in a header.
pub struct HttpCourseApi {
    client: Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

fn is_unsafe(method: &Method) -> bool {
    !matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// Value of `name` in a `Cookie` header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

impl HttpCourseApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| ApiError::Request(format!("invalid base url {}: {}", base, e)))?;

        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(config.timeout)
            .cookie_provider(cookies.clone())
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            cookies,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::Request(format!("bad endpoint {}: {}", path, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn csrf_token(&self, url: &Url) -> Option<String> {
        let header = self.cookies.cookies(url)?;
        cookie_value(header.to_str().ok()?, CSRF_COOKIE)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<reqwest::Response, ApiError> {
        debug!("{} {}", method, url);
        let mut request = self.client.request(method.clone(), url.clone());
        if is_unsafe(&method) {
            match self.csrf_token(&url) {
                Some(token) => request = request.header(CSRF_HEADER, token),
                None => debug!("no CSRF cookie for {} {}", method, url),
            }
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(ApiError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            warn!("API error {} for {}: {}", status, url, body);
            return Err(ApiError::Connection {
                reason: ConnectionErrorReason::Server,
                message: format!("{} {}", status, body),
            });
        }
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let response = self.execute(method, url, body).await?;
        let text = response.text().await.map_err(ApiError::from_transport)?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            tracing::error!("Failed to parse: {}", e);
            ApiError::Decode(e.to_string())
        })
    }

    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> Result<(), ApiError> {
        self.execute(method, url, body).await.map(|_| ())
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Request(e.to_string()))
}

fn page_pairs(pagination: Pagination) -> Vec<(&'static str, String)> {
    vec![
        ("page", pagination.page.to_string()),
        ("page_size", pagination.page_size.to_string()),
    ]
}

#[async_trait]
impl CourseApi for HttpCourseApi {
    async fn list_courses(&self, query: &CourseListQuery) -> Result<Page<Course>, ApiError> {
        let url = self.endpoint("courses/", &query.to_pairs())?;
        self.fetch(Method::GET, url, None).await
    }

    async fn get_course(&self, id: Uuid) -> Result<CourseDetail, ApiError> {
        let url = self.endpoint(&format!("courses/{}/", id), &[])?;
        self.fetch(Method::GET, url, None).await
    }

    async fn course_analytics(
        &self,
        query: &CourseListQuery,
    ) -> Result<Vec<CourseAnalytics>, ApiError> {
        let query = CourseListQuery {
            ordering: None,
            page: None,
            page_size: None,
            ..query.clone()
        };
        let url = self.endpoint("analytics/courses/", &query.to_pairs())?;
        self.fetch(Method::GET, url, None).await
    }

    async fn list_course_ratings(
        &self,
        course_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<Rating>, ApiError> {
        let url = self.endpoint(&format!("courses/{}/ratings/", course_id), &page_pairs(pagination))?;
        self.fetch(Method::GET, url, None).await
    }

    async fn create_rating(
        &self,
        course_id: Uuid,
        payload: &RatingPayload,
    ) -> Result<Rating, ApiError> {
        let url = self.endpoint(&format!("courses/{}/ratings/", course_id), &[])?;
        self.fetch(Method::POST, url, Some(to_body(payload)?)).await
    }

    async fn update_rating(
        &self,
        course_id: Uuid,
        rating_id: Uuid,
        payload: &RatingPayload,
    ) -> Result<Rating, ApiError> {
        let url = self.endpoint(&format!("courses/{}/ratings/{}/", course_id, rating_id), &[])?;
        self.fetch(Method::PATCH, url, Some(to_body(payload)?)).await
    }

    async fn delete_rating(&self, course_id: Uuid, rating_id: Uuid) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("courses/{}/ratings/{}/", course_id, rating_id), &[])?;
        self.send(Method::DELETE, url, None).await
    }

    async fn upsert_vote(&self, rating_id: Uuid, vote: VoteType) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("ratings/{}/votes/", rating_id), &[])?;
        self.send(Method::PUT, url, Some(json!({ "vote_type": vote }))).await
    }

    async fn delete_vote(&self, rating_id: Uuid) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("ratings/{}/votes/", rating_id), &[])?;
        self.send(Method::DELETE, url, None).await
    }

    async fn my_ratings(&self) -> Result<Vec<StudentRating>, ApiError> {
        let url = self.endpoint("students/me/ratings/", &[])?;
        self.fetch(Method::GET, url, None).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        let url = self.endpoint("courses/filter-options/", &[])?;
        self.fetch(Method::GET, url, None).await
    }

    async fn session(&self) -> Result<Session, ApiError> {
        let url = self.endpoint("auth/session/", &[])?;
        self.fetch(Method::GET, url, None).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        let url = self.endpoint("auth/login/", &[])?;
        self.fetch(Method::POST, url, Some(to_body(request)?)).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint("auth/logout/", &[])?;
        self.send(Method::POST, url, None).await
    }
}
