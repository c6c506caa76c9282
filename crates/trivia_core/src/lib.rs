//! Core domain logic for the trivia API.
//! Storage, pagination and quiz selection live here; transports stay thin.

pub mod db;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::question::{NewQuestion, Question, QuestionId, QuestionValidationError};
pub use pagination::{paginate, paginate_with, Page, PageRequest, QUESTIONS_PER_PAGE};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::memory::InMemoryTriviaStore;
pub use repo::question_repo::{
    QuestionFilter, QuestionListQuery, QuestionRepository, RepoError, RepoResult,
    SqliteQuestionRepository,
};
pub use service::category_catalog::CategoryCatalog;
pub use service::question_service::QuestionService;
pub use service::quiz_service::{CategoryConstraint, QuizRequest, QuizSelector};
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
