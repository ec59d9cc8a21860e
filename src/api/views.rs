//! JSON view models, one per page.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::client::ConnectionErrorReason;
use crate::client::connection::CONNECTION_ERROR_PATH;
use crate::filters::ListParams;
use crate::format::{self, Tone};
use crate::models::{Course, CourseStatus, Page, Rating, SpecialityBadge, StudentRating};
use crate::scatter::{ChartVariant, CourseDataPoint, Margins, PlacedLabel, ZoomTransform};
use crate::table::{PageItem, SortDirection, page_window};
use crate::votes::VoteState;

const PAGE_SIBLINGS: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ScoreBadge {
    pub value: Option<f64>,
    pub display: String,
    pub tone: Tone,
    pub class_name: &'static str,
}

impl ScoreBadge {
    fn new(value: Option<f64>, tone: Tone) -> Self {
        Self {
            value,
            display: format::format_score(value),
            tone,
            class_name: tone.class_name(),
        }
    }

    pub fn difficulty(value: Option<f64>) -> Self {
        Self::new(value, format::difficulty_tone(value))
    }

    pub fn usefulness(value: Option<f64>) -> Self {
        Self::new(value, format::usefulness_tone(value))
    }
}

#[derive(Debug, Serialize)]
pub struct SpecialityView {
    pub code: String,
    pub name: String,
    pub type_label: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CourseRow {
    pub id: Uuid,
    pub title: String,
    pub faculty_name: String,
    pub department_name: String,
    pub difficulty: ScoreBadge,
    pub usefulness: ScoreBadge,
    pub ratings_count: u32,
    pub status: CourseStatus,
    pub status_label: &'static str,
    pub specialities: Vec<SpecialityView>,
}

impl From<&SpecialityBadge> for SpecialityView {
    fn from(badge: &SpecialityBadge) -> Self {
        Self {
            code: badge.code.clone(),
            name: badge.name.clone(),
            type_label: badge.type_kind.map(format::course_type_label),
        }
    }
}

impl From<&Course> for CourseRow {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            faculty_name: course.faculty_name.clone(),
            department_name: course.department_name.clone(),
            difficulty: ScoreBadge::difficulty(course.avg_difficulty),
            usefulness: ScoreBadge::usefulness(course.avg_usefulness),
            ratings_count: course.ratings_count,
            status: course.status,
            status_label: format::course_status_label(course.status),
            specialities: course.specialities.iter().map(SpecialityView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationView {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub pages: Vec<PageItem>,
}

impl PaginationView {
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            count: page.count,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            pages: page_window(page.page, page.total_pages, PAGE_SIBLINGS),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CoursesPage {
    pub params: ListParams,
    /// Canonical query string for the current state (defaults omitted).
    pub query_string: String,
    pub active_filters: usize,
    pub rows: Vec<CourseRow>,
    pub sort_headers: Vec<SortHeaderView>,
    pub pagination: PaginationView,
}

/// Column, header label and the direction a first click sorts by.
const SORT_HEADERS: [(&str, &str, SortDirection); 4] = [
    ("title", "Назва", SortDirection::Asc),
    ("avg_difficulty", "Складність", SortDirection::Desc),
    ("avg_usefulness", "Корисність", SortDirection::Desc),
    ("ratings_count", "Оцінок", SortDirection::Desc),
];

/// A sortable column header and where clicking it leads. `multi_href` is
/// the shift-click target, which keeps the other sorted columns.
#[derive(Debug, Serialize)]
pub struct SortHeaderView {
    pub column: &'static str,
    pub label: &'static str,
    pub direction: Option<SortDirection>,
    /// 1-based position in a multi-column sort.
    pub priority: Option<usize>,
    pub href: String,
    pub multi_href: String,
}

fn list_href(params: &ListParams) -> String {
    let query = params.to_query_string();
    if query.is_empty() {
        "/courses".to_string()
    } else {
        format!("/courses?{}", query)
    }
}

impl SortHeaderView {
    pub fn for_list(params: &ListParams) -> Vec<Self> {
        SORT_HEADERS
            .iter()
            .map(|&(column, label, initial)| {
                let clicked = |multi: bool| {
                    let mut next = params.clone();
                    next.sort.toggle(column, initial, multi);
                    next.pagination = next.pagination.first_page();
                    list_href(&next)
                };
                Self {
                    column,
                    label,
                    direction: params.sort.direction_of(column),
                    priority: params
                        .sort
                        .keys()
                        .iter()
                        .position(|k| k.column == column)
                        .map(|i| i + 1),
                    href: clicked(false),
                    multi_href: clicked(true),
                }
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct RatingView {
    pub id: Uuid,
    pub difficulty: u8,
    pub usefulness: u8,
    pub comment: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub vote: VoteState,
}

impl RatingView {
    pub fn new(rating: &Rating, vote: VoteState) -> Self {
        Self {
            id: rating.id,
            difficulty: rating.difficulty,
            usefulness: rating.usefulness,
            comment: rating.comment.clone(),
            is_anonymous: rating.is_anonymous,
            created_at: rating.created_at,
            vote,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseDetailPage {
    pub course: CourseRow,
    pub description: Option<String>,
    pub instructors: Vec<String>,
    pub ratings: Vec<RatingView>,
    pub ratings_pagination: PaginationView,
}

#[derive(Debug, Serialize)]
pub struct LabelView {
    pub id: Uuid,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl From<&PlacedLabel<'_>> for LabelView {
    fn from(label: &PlacedLabel<'_>) -> Self {
        Self {
            id: label.point.id,
            name: label.point.name.clone(),
            x: label.x,
            y: label.y,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExplorePage {
    pub params: ListParams,
    pub variant: ChartVariant,
    pub width: f64,
    pub height: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub margins: Margins,
    pub transform: ZoomTransform,
    pub total_courses: usize,
    pub points: Vec<CourseDataPoint>,
    pub labels: Vec<LabelView>,
}

#[derive(Debug, Serialize)]
pub struct MyRatingsPage {
    pub count: usize,
    pub ratings: Vec<StudentRating>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionErrorPage {
    pub reason: ConnectionErrorReason,
    pub title: &'static str,
    pub message: &'static str,
    pub from: String,
    pub retry_action: String,
}

impl ConnectionErrorPage {
    pub fn new(reason: ConnectionErrorReason, from: String) -> Self {
        let retry_action = format!(
            "{}/retry?{}",
            CONNECTION_ERROR_PATH,
            url::form_urlencoded::Serializer::new(String::new())
                .append_pair("from", &from)
                .finish()
        );
        Self {
            reason,
            title: reason.title(),
            message: reason.message(),
            from,
            retry_action,
        }
    }
}
