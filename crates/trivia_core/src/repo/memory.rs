//! In-memory trivia store.
//!
//! Implements both repository traits over plain collections so services can
//! be exercised without SQLite. Semantics mirror the SQLite repositories:
//! newest-first ordering, monotonic ids that are never reused, `NotFound` on
//! deleting a missing id.

use crate::model::category::{Category, CategoryId};
use crate::model::question::{NewQuestion, Question, QuestionId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::question_repo::{
    QuestionFilter, QuestionListQuery, QuestionRepository, RepoError, RepoResult,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-memory question/category store.
#[derive(Debug)]
pub struct InMemoryTriviaStore {
    categories: BTreeMap<CategoryId, Category>,
    questions: RefCell<BTreeMap<QuestionId, Question>>,
    next_id: Cell<QuestionId>,
}

impl InMemoryTriviaStore {
    /// Creates an empty store with the given categories.
    pub fn with_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: categories
                .into_iter()
                .map(|category| (category.id, category))
                .collect(),
            questions: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
        }
    }

    /// Creates an empty store seeded with the standard six categories.
    pub fn new() -> Self {
        Self::with_categories(
            [
                (1, "Science"),
                (2, "Art"),
                (3, "Geography"),
                (4, "History"),
                (5, "Entertainment"),
                (6, "Sports"),
            ]
            .into_iter()
            .map(|(id, label)| Category::new(id, label)),
        )
    }

    fn matching(&self, filter: &QuestionFilter) -> Vec<Question> {
        self.questions
            .borrow()
            .values()
            .rev()
            .filter(|question| filter.matches(question))
            .cloned()
            .collect()
    }
}

impl Default for InMemoryTriviaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionRepository for InMemoryTriviaStore {
    fn create_question(&self, submission: &NewQuestion) -> RepoResult<Question> {
        let draft = submission.validate()?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let question = Question {
            id,
            question: draft.question,
            answer: draft.answer,
            difficulty: draft.difficulty,
            category: draft.category,
        };
        self.questions.borrow_mut().insert(id, question.clone());
        Ok(question)
    }

    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>> {
        Ok(self.questions.borrow().get(&id).cloned())
    }

    fn delete_question(&self, id: QuestionId) -> RepoResult<()> {
        match self.questions.borrow_mut().remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn list_questions(&self, query: &QuestionListQuery) -> RepoResult<Vec<Question>> {
        let offset = query.offset as usize;
        let limit = query.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(self
            .matching(&query.filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    fn count_questions(&self, filter: &QuestionFilter) -> RepoResult<u64> {
        Ok(self.matching(filter).len() as u64)
    }
}

impl CategoryRepository for InMemoryTriviaStore {
    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        Ok(self.categories.values().cloned().collect())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(self.categories.get(&id).cloned())
    }
}
