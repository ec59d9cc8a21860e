use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseType {
    Compulsory,
    Elective,
    ProfOriented,
}

impl CourseType {
    pub const ALL: [CourseType; 3] = [
        CourseType::Compulsory,
        CourseType::Elective,
        CourseType::ProfOriented,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            CourseType::Compulsory => "COMPULSORY",
            CourseType::Elective => "ELECTIVE",
            CourseType::ProfOriented => "PROF_ORIENTED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemesterTerm {
    Fall,
    Spring,
    Summer,
}

impl SemesterTerm {
    pub const ALL: [SemesterTerm; 3] = [
        SemesterTerm::Fall,
        SemesterTerm::Spring,
        SemesterTerm::Summer,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            SemesterTerm::Fall => "FALL",
            SemesterTerm::Spring => "SPRING",
            SemesterTerm::Summer => "SUMMER",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    Planned,
    Active,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialityBadge {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub type_kind: Option<CourseType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub faculty_name: String,
    pub department_name: String,
    pub avg_difficulty: Option<f64>,
    pub avg_usefulness: Option<f64>,
    #[serde(default)]
    pub ratings_count: u32,
    pub status: CourseStatus,
    #[serde(default)]
    pub specialities: Vec<SpecialityBadge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructors: Vec<String>,
}

/// Row of the analytics endpoint backing the explore scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAnalytics {
    pub id: Uuid,
    pub name: String,
    pub faculty_name: String,
    pub avg_difficulty: Option<f64>,
    pub avg_usefulness: Option<f64>,
    #[serde(default)]
    pub ratings_count: u32,
}
