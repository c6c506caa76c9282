//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations the API exposes.
//! - Translate repository errors into the service error taxonomy.
//!
//! # Invariants
//! - Services never swallow a failure; every error reaches the caller.
//! - Services hold no state between calls beyond their repositories.

pub mod category_catalog;
pub mod question_service;
pub mod quiz_service;

use crate::model::question::{QuestionId, QuestionValidationError};
use crate::repo::question_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to API callers.
#[derive(Debug)]
pub enum ServiceError {
    /// Submission is missing a field or references an unknown category.
    Validation(QuestionValidationError),
    /// Target question does not exist.
    NotFound(QuestionId),
    /// Quiz filtering left no candidate question.
    NoQuestionsAvailable,
    /// Backing-store failure.
    Store(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid question: {err}"),
            Self::NotFound(id) => write!(f, "question not found: {id}"),
            Self::NoQuestionsAvailable => write!(f, "no questions available"),
            Self::Store(err) => write!(f, "trivia store failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::NoQuestionsAvailable => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<QuestionValidationError> for ServiceError {
    fn from(value: QuestionValidationError) -> Self {
        Self::Validation(value)
    }
}
