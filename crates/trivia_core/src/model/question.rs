//! Question records and submission validation.
//!
//! # Invariants
//! - `question` and `answer` are non-blank.
//! - `difficulty` is at least 1. No upper bound is enforced.
//! - `category` is required. Existence of the referenced category is
//!   checked by the service layer, not here.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned question identifier.
pub type QuestionId = i64;

/// Stored trivia question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: CategoryId,
}

/// Question submission before an id is assigned.
///
/// Every field is optional so callers can hand over partially filled
/// payloads and get a precise [`QuestionValidationError`] back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub difficulty: Option<i64>,
    pub category: Option<CategoryId>,
}

/// Validated submission, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: CategoryId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionValidationError {
    MissingField(&'static str),
    BlankField(&'static str),
    NonPositiveDifficulty(i64),
    UnknownCategory(CategoryId),
}

impl Display for QuestionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::NonPositiveDifficulty(value) => {
                write!(f, "difficulty must be a positive integer, got {value}")
            }
            Self::UnknownCategory(id) => write!(f, "category {id} does not exist"),
        }
    }
}

impl Error for QuestionValidationError {}

impl NewQuestion {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        difficulty: i64,
        category: CategoryId,
    ) -> Self {
        Self {
            question: Some(question.into()),
            answer: Some(answer.into()),
            difficulty: Some(difficulty),
            category: Some(category),
        }
    }

    /// Checks presence and shape of every field and returns a draft.
    ///
    /// Text fields are trimmed before the blank check and stored trimmed.
    pub fn validate(&self) -> Result<QuestionDraft, QuestionValidationError> {
        let question = required_text(self.question.as_deref(), "question")?;
        let answer = required_text(self.answer.as_deref(), "answer")?;
        let difficulty = self
            .difficulty
            .ok_or(QuestionValidationError::MissingField("difficulty"))?;
        if difficulty < 1 {
            return Err(QuestionValidationError::NonPositiveDifficulty(difficulty));
        }
        let category = self
            .category
            .ok_or(QuestionValidationError::MissingField("category"))?;

        Ok(QuestionDraft {
            question,
            answer,
            difficulty,
            category,
        })
    }
}

fn required_text(
    value: Option<&str>,
    field: &'static str,
) -> Result<String, QuestionValidationError> {
    let value = value.ok_or(QuestionValidationError::MissingField(field))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QuestionValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{NewQuestion, QuestionValidationError};

    #[test]
    fn validate_trims_text_fields() {
        let draft = NewQuestion::new("  Who painted the Mona Lisa? ", " Leonardo ", 2, 2)
            .validate()
            .expect("complete submission should validate");
        assert_eq!(draft.question, "Who painted the Mona Lisa?");
        assert_eq!(draft.answer, "Leonardo");
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let submission = NewQuestion {
            question: Some("q".to_string()),
            answer: None,
            difficulty: Some(1),
            category: None,
        };
        assert_eq!(
            submission.validate(),
            Err(QuestionValidationError::MissingField("answer"))
        );
    }

    #[test]
    fn validate_rejects_blank_and_non_positive_values() {
        assert_eq!(
            NewQuestion::new("   ", "a", 1, 1).validate(),
            Err(QuestionValidationError::BlankField("question"))
        );
        assert_eq!(
            NewQuestion::new("q", "a", 0, 1).validate(),
            Err(QuestionValidationError::NonPositiveDifficulty(0))
        );
    }

    #[test]
    fn question_serializes_with_client_field_names() {
        let question = super::Question {
            id: 7,
            question: "q".to_string(),
            answer: "a".to_string(),
            difficulty: 3,
            category: 4,
        };
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["category"], 4);
        assert_eq!(value["difficulty"], 3);
    }
}
