use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;
pub const MAX_COMMENT_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    Upvote,
    Downvote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub difficulty: u8,
    pub usefulness: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default)]
    pub viewer_vote: Option<VoteType>,
}

/// Rating attached to the course it belongs to, as listed on "my ratings".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRating {
    pub course_id: Uuid,
    pub course_title: String,
    #[serde(flatten)]
    pub rating: Rating,
}

/// Create/edit payload for a rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingForm {
    pub difficulty: Option<u8>,
    pub usefulness: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Validated body sent to the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingPayload {
    pub difficulty: u8,
    pub usefulness: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub is_anonymous: bool,
}

pub type FieldErrors = BTreeMap<String, String>;

impl RatingForm {
    pub fn validate(&self) -> Result<RatingPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let difficulty = check_score(self.difficulty, "difficulty", &mut errors);
        let usefulness = check_score(self.usefulness, "usefulness", &mut errors);

        let comment = self
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        if let Some(c) = &comment {
            if c.chars().count() > MAX_COMMENT_LEN {
                errors.insert(
                    "comment".to_string(),
                    format!("Коментар не може перевищувати {} символів", MAX_COMMENT_LEN),
                );
            }
        }

        match (difficulty, usefulness) {
            (Some(difficulty), Some(usefulness)) if errors.is_empty() => Ok(RatingPayload {
                difficulty,
                usefulness,
                comment,
                is_anonymous: self.is_anonymous,
            }),
            _ => Err(errors),
        }
    }
}

fn check_score(value: Option<u8>, field: &str, errors: &mut FieldErrors) -> Option<u8> {
    match value {
        None => {
            errors.insert(field.to_string(), "Обов'язкове поле".to_string());
            None
        }
        Some(v) if !(MIN_SCORE..=MAX_SCORE).contains(&v) => {
            errors.insert(
                field.to_string(),
                format!("Оцінка має бути від {} до {}", MIN_SCORE, MAX_SCORE),
            );
            None
        }
        Some(v) => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(difficulty: Option<u8>, usefulness: Option<u8>, comment: Option<&str>) -> RatingForm {
        RatingForm {
            difficulty,
            usefulness,
            comment: comment.map(str::to_string),
            is_anonymous: false,
        }
    }

    #[test]
    fn valid_form_trims_comment() {
        let payload = form(Some(3), Some(5), Some("  solid course  ")).validate().unwrap();
        assert_eq!(payload.difficulty, 3);
        assert_eq!(payload.comment.as_deref(), Some("solid course"));
    }

    #[test]
    fn blank_comment_is_dropped() {
        let payload = form(Some(1), Some(1), Some("   ")).validate().unwrap();
        assert_eq!(payload.comment, None);
    }

    #[test]
    fn missing_and_out_of_range_scores_are_reported_per_field() {
        let errors = form(None, Some(6), None).validate().unwrap_err();
        assert!(errors.contains_key("difficulty"));
        assert!(errors.contains_key("usefulness"));

        let errors = form(Some(0), Some(4), None).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("difficulty"));
    }

    #[test]
    fn overlong_comment_is_rejected() {
        let long = "a".repeat(MAX_COMMENT_LEN + 1);
        let errors = form(Some(2), Some(2), Some(&long)).validate().unwrap_err();
        assert!(errors.contains_key("comment"));
    }
}
