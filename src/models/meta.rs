use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub faculties: Vec<FilterOption>,
    #[serde(default)]
    pub departments: Vec<FilterOption>,
    #[serde(default)]
    pub instructors: Vec<FilterOption>,
    #[serde(default)]
    pub semester_terms: Vec<FilterOption>,
    #[serde(default)]
    pub semester_years: Vec<FilterOption>,
    #[serde(default)]
    pub course_types: Vec<FilterOption>,
    #[serde(default)]
    pub specialities: Vec<FilterOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub is_authenticated: bool,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
