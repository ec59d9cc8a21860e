//! Filter state for the course list and explore views, and its mapping onto
//! API query parameters.

pub mod commit;
pub mod params;

use serde::{Deserialize, Serialize};

use crate::models::{CourseType, FieldErrors, SemesterTerm};
use crate::table::{Pagination, SortState};

pub use commit::FilterCommitter;
pub use params::{ListParams, format_range, parse_range};

pub const SCORE_MIN: f64 = 1.0;
pub const SCORE_MAX: f64 = 5.0;

/// Inclusive `(min, max)` score range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange(pub f64, pub f64);

impl ScoreRange {
    pub const FULL: ScoreRange = ScoreRange(SCORE_MIN, SCORE_MAX);

    pub fn min(&self) -> f64 {
        self.0
    }

    pub fn max(&self) -> f64 {
        self.1
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && self.0 >= SCORE_MIN
            && self.1 <= SCORE_MAX
            && self.0 <= self.1
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self::FULL
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search_query: String,
    pub difficulty_range: ScoreRange,
    pub usefulness_range: ScoreRange,
    pub faculty: Option<String>,
    pub department: Option<String>,
    pub instructor: Option<String>,
    pub semester_term: Option<SemesterTerm>,
    pub semester_year: Option<String>,
    pub course_type: Option<CourseType>,
    pub speciality: Option<String>,
}

impl FilterState {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for (field, range) in [
            ("difficulty_range", self.difficulty_range),
            ("usefulness_range", self.usefulness_range),
        ] {
            if !range.is_valid() {
                errors.insert(
                    field.to_string(),
                    format!(
                        "Діапазон має бути в межах {}–{}, мінімум не більший за максимум",
                        SCORE_MIN, SCORE_MAX
                    ),
                );
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Blank ids and search text collapse to "unset".
    pub fn normalized(mut self) -> Self {
        self.search_query = self.search_query.trim().to_string();
        for id in [
            &mut self.faculty,
            &mut self.department,
            &mut self.instructor,
            &mut self.semester_year,
            &mut self.speciality,
        ] {
            if id.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *id = None;
            }
        }
        self
    }

    pub fn is_default(&self) -> bool {
        self.clone().normalized() == FilterState::default()
    }

    /// Number of non-default filters, shown as a badge on the filter panel.
    pub fn active_count(&self) -> usize {
        let f = self.clone().normalized();
        [
            !f.search_query.is_empty(),
            !f.difficulty_range.is_full(),
            !f.usefulness_range.is_full(),
            f.faculty.is_some(),
            f.department.is_some(),
            f.instructor.is_some(),
            f.semester_term.is_some(),
            f.semester_year.is_some(),
            f.course_type.is_some(),
            f.speciality.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn to_api_query(&self, pagination: Option<Pagination>, sort: &SortState) -> CourseListQuery {
        let f = self.clone().normalized();
        let (difficulty_min, difficulty_max) = range_bounds(f.difficulty_range);
        let (usefulness_min, usefulness_max) = range_bounds(f.usefulness_range);

        CourseListQuery {
            search: Some(f.search_query).filter(|q| !q.is_empty()),
            avg_difficulty_min: difficulty_min,
            avg_difficulty_max: difficulty_max,
            avg_usefulness_min: usefulness_min,
            avg_usefulness_max: usefulness_max,
            faculty: f.faculty,
            department: f.department,
            instructor: f.instructor,
            semester_term: f.semester_term,
            semester_year: f.semester_year,
            type_kind: f.course_type,
            speciality: f.speciality,
            ordering: Some(sort.to_ordering()).filter(|o| !o.is_empty()),
            page: pagination.map(|p| p.page),
            page_size: pagination.map(|p| p.page_size),
        }
    }
}

/// Only bounds that differ from the domain edge narrow the query.
fn range_bounds(range: ScoreRange) -> (Option<f64>, Option<f64>) {
    if !range.is_valid() {
        return (None, None);
    }
    (
        (range.min() > SCORE_MIN).then_some(range.min()),
        (range.max() < SCORE_MAX).then_some(range.max()),
    )
}

/// Query parameters of the course list and analytics endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseListQuery {
    pub search: Option<String>,
    pub avg_difficulty_min: Option<f64>,
    pub avg_difficulty_max: Option<f64>,
    pub avg_usefulness_min: Option<f64>,
    pub avg_usefulness_max: Option<f64>,
    pub faculty: Option<String>,
    pub department: Option<String>,
    pub instructor: Option<String>,
    pub semester_term: Option<SemesterTerm>,
    pub semester_year: Option<String>,
    pub type_kind: Option<CourseType>,
    pub speciality: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl CourseListQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value {
                pairs.push((key, v));
            }
        };
        push("search", self.search.clone());
        push("avg_difficulty_min", self.avg_difficulty_min.map(|v| v.to_string()));
        push("avg_difficulty_max", self.avg_difficulty_max.map(|v| v.to_string()));
        push("avg_usefulness_min", self.avg_usefulness_min.map(|v| v.to_string()));
        push("avg_usefulness_max", self.avg_usefulness_max.map(|v| v.to_string()));
        push("faculty", self.faculty.clone());
        push("department", self.department.clone());
        push("instructor", self.instructor.clone());
        push("semester_term", self.semester_term.map(|t| t.code().to_string()));
        push("semester_year", self.semester_year.clone());
        push("type_kind", self.type_kind.map(|t| t.code().to_string()));
        push("speciality", self.speciality.clone());
        push("ordering", self.ordering.clone());
        push("page", self.page.map(|v| v.to_string()));
        push("page_size", self.page_size.map(|v| v.to_string()));
        pairs
    }
}
