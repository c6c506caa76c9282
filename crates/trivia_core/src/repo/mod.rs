//! Repository layer for questions and categories.
//!
//! # Responsibility
//! - Define storage-agnostic data access contracts.
//! - Keep SQLite query details out of services.
//! - Provide an in-memory implementation for tests and embedding.
//!
//! # Invariants
//! - Repository writes validate submissions before persistence.
//! - Semantic errors (`NotFound`) are reported separately from storage
//!   transport errors.

pub mod category_repo;
pub mod memory;
pub mod question_repo;

use crate::model::category::{Category, CategoryId};
use crate::model::question::{NewQuestion, Question, QuestionId};
use category_repo::CategoryRepository;
use question_repo::{QuestionFilter, QuestionListQuery, QuestionRepository, RepoResult};

// Lets one store back several services at once (`QuestionService::new(&store, &store)`).
impl<T: QuestionRepository + ?Sized> QuestionRepository for &T {
    fn create_question(&self, submission: &NewQuestion) -> RepoResult<Question> {
        (**self).create_question(submission)
    }

    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>> {
        (**self).get_question(id)
    }

    fn delete_question(&self, id: QuestionId) -> RepoResult<()> {
        (**self).delete_question(id)
    }

    fn list_questions(&self, query: &QuestionListQuery) -> RepoResult<Vec<Question>> {
        (**self).list_questions(query)
    }

    fn count_questions(&self, filter: &QuestionFilter) -> RepoResult<u64> {
        (**self).count_questions(filter)
    }
}

impl<T: CategoryRepository + ?Sized> CategoryRepository for &T {
    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        (**self).list_categories()
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        (**self).get_category(id)
    }
}
