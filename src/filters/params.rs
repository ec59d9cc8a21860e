//! URL search-parameter codec for list state.
//!
//! Keys are short (`q`, `diff`, `use`, `faculty`, `dept`, `instructor`, `term`,
//! `year`, `type`, `spec`, `page`, `size`, `sort`). Values equal to their
//! default are never written, so a pristine list has an empty query string.

use serde::Serialize;
use url::form_urlencoded;

use super::{FilterState, ScoreRange};
use crate::models::{CourseType, SemesterTerm};
use crate::table::{DEFAULT_PAGE_SIZE, Pagination, SortState};

pub const SORTABLE_COLUMNS: [&str; 4] = ["title", "avg_difficulty", "avg_usefulness", "ratings_count"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListParams {
    pub filters: FilterState,
    pub pagination: Pagination,
    pub sort: SortState,
}

/// `"<min>-<max>"`.
pub fn format_range(range: ScoreRange) -> String {
    format!("{}-{}", range.min(), range.max())
}

/// Parses `"<min>-<max>"`. Anything malformed, out of bounds or inverted
/// yields the full default range; a single bound is never applied alone.
pub fn parse_range(raw: &str) -> ScoreRange {
    raw.split_once('-')
        .and_then(|(min, max)| {
            let range = ScoreRange(min.parse().ok()?, max.parse().ok()?);
            range.is_valid().then_some(range)
        })
        .unwrap_or_default()
}

fn is_sortable(column: &str) -> bool {
    SORTABLE_COLUMNS.contains(&column)
}

impl ListParams {
    pub fn to_url_params(&self) -> Vec<(&'static str, String)> {
        let f = self.filters.clone().normalized();
        let mut params = Vec::new();

        if !f.search_query.is_empty() {
            params.push(("q", f.search_query));
        }
        if f.difficulty_range.is_valid() && !f.difficulty_range.is_full() {
            params.push(("diff", format_range(f.difficulty_range)));
        }
        if f.usefulness_range.is_valid() && !f.usefulness_range.is_full() {
            params.push(("use", format_range(f.usefulness_range)));
        }
        for (key, value) in [
            ("faculty", f.faculty),
            ("dept", f.department),
            ("instructor", f.instructor),
            ("term", f.semester_term.map(|t| t.code().to_string())),
            ("year", f.semester_year),
            ("type", f.course_type.map(|t| t.code().to_string())),
            ("spec", f.speciality),
        ] {
            if let Some(value) = value {
                params.push((key, value));
            }
        }

        let defaults = Pagination::default();
        if self.pagination.page != defaults.page {
            params.push(("page", self.pagination.page.to_string()));
        }
        if self.pagination.page_size != defaults.page_size {
            params.push(("size", self.pagination.page_size.to_string()));
        }
        if !self.sort.is_empty() {
            params.push(("sort", self.sort.to_ordering()));
        }
        params
    }

    /// Unknown keys are ignored; invalid values fall back to their default.
    pub fn from_url_params<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            let id = || Some(value.trim().to_string()).filter(|v| !v.is_empty());
            let f = &mut params.filters;
            match key.as_ref() {
                "q" => f.search_query = value.trim().to_string(),
                "diff" => f.difficulty_range = parse_range(value),
                "use" => f.usefulness_range = parse_range(value),
                "faculty" => f.faculty = id(),
                "dept" => f.department = id(),
                "instructor" => f.instructor = id(),
                "term" => f.semester_term = SemesterTerm::from_code(value),
                "year" => f.semester_year = id(),
                "type" => f.course_type = CourseType::from_code(value),
                "spec" => f.speciality = id(),
                "page" => {
                    params.pagination.page = value
                        .parse::<u32>()
                        .ok()
                        .filter(|p| *p >= 1)
                        .unwrap_or(1)
                }
                "size" => {
                    params.pagination.page_size = value
                        .parse::<u32>()
                        .ok()
                        .filter(|s| Pagination::is_allowed_size(*s))
                        .unwrap_or(DEFAULT_PAGE_SIZE)
                }
                "sort" => params.sort = SortState::parse(value, is_sortable),
                _ => {}
            }
        }
        params
    }

    pub fn from_query_string(query: &str) -> Self {
        Self::from_url_params(form_urlencoded::parse(query.trim_start_matches('?').as_bytes()))
    }

    /// Percent-encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_url_params())
            .finish()
    }

    /// Same filters and sort, pagination back to page 1.
    pub fn with_filters(&self, filters: FilterState) -> Self {
        Self {
            filters,
            pagination: self.pagination.first_page(),
            sort: self.sort.clone(),
        }
    }
}
