use serde::Serialize;

use crate::models::{CourseStatus, CourseType, SemesterTerm};

const GOOD_BELOW: f64 = 2.5;
const BAD_FROM: f64 = 3.75;

/// Visual tone applied to score badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Moderate,
    Negative,
    Neutral,
}

impl Tone {
    pub fn class_name(&self) -> &'static str {
        match self {
            Tone::Positive => "tone-positive",
            Tone::Moderate => "tone-moderate",
            Tone::Negative => "tone-negative",
            Tone::Neutral => "tone-neutral",
        }
    }
}

pub fn course_type_label(course_type: CourseType) -> &'static str {
    match course_type {
        CourseType::Compulsory => "Обов'язковий",
        CourseType::Elective => "Вибірковий",
        CourseType::ProfOriented => "Професійно-орієнтований",
    }
}

pub fn semester_term_label(term: SemesterTerm) -> &'static str {
    match term {
        SemesterTerm::Fall => "Осінь",
        SemesterTerm::Spring => "Весна",
        SemesterTerm::Summer => "Літо",
    }
}

pub fn course_status_label(status: CourseStatus) -> &'static str {
    match status {
        CourseStatus::Planned => "Заплановано",
        CourseStatus::Active => "Активний",
        CourseStatus::Finished => "Завершено",
    }
}

/// Lower difficulty reads as better.
pub fn difficulty_tone(value: Option<f64>) -> Tone {
    match value {
        None => Tone::Neutral,
        Some(v) if v < GOOD_BELOW => Tone::Positive,
        Some(v) if v < BAD_FROM => Tone::Moderate,
        Some(_) => Tone::Negative,
    }
}

/// Higher usefulness reads as better.
pub fn usefulness_tone(value: Option<f64>) -> Tone {
    match value {
        None => Tone::Neutral,
        Some(v) if v >= BAD_FROM => Tone::Positive,
        Some(v) if v >= GOOD_BELOW => Tone::Moderate,
        Some(_) => Tone::Negative,
    }
}

pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.1}", v),
        _ => "—".to_string(),
    }
}
