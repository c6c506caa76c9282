//! Quiz question selection.
//!
//! # Responsibility
//! - Narrow the question set by the caller's exclusion set and category
//!   constraint.
//! - Pick one remaining candidate uniformly at random.
//!
//! # Invariants
//! - An excluded id is never returned.
//! - With `CategoryConstraint::Only(id)` only questions of that category
//!   are returned.
//! - An empty candidate set is `ServiceError::NoQuestionsAvailable`.
//! - The selector keeps no memory of earlier picks; callers extend their
//!   exclusion set themselves.

use crate::model::category::CategoryId;
use crate::model::question::{Question, QuestionId};
use crate::repo::question_repo::{QuestionFilter, QuestionListQuery, QuestionRepository};
use crate::service::{ServiceError, ServiceResult};
use log::info;
use rand::Rng;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Which categories a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryConstraint {
    #[default]
    Any,
    Only(CategoryId),
}

impl Display for CategoryConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Only(id) => write!(f, "{id}"),
        }
    }
}

/// Per-request quiz state supplied by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizRequest {
    pub previous_questions: BTreeSet<QuestionId>,
    pub category: CategoryConstraint,
}

impl QuizRequest {
    pub fn new(
        previous_questions: impl IntoIterator<Item = QuestionId>,
        category: CategoryConstraint,
    ) -> Self {
        Self {
            previous_questions: previous_questions.into_iter().collect(),
            category,
        }
    }

    fn candidate_filter(&self) -> QuestionFilter {
        QuestionFilter {
            search: None,
            category: match self.category {
                CategoryConstraint::Any => None,
                CategoryConstraint::Only(id) => Some(id),
            },
            exclude: self.previous_questions.clone(),
        }
    }
}

/// Stateless quiz selector over a question repository.
pub struct QuizSelector<Q: QuestionRepository> {
    questions: Q,
}

impl<Q: QuestionRepository> QuizSelector<Q> {
    pub fn new(questions: Q) -> Self {
        Self { questions }
    }

    /// Returns every question the next draw may pick.
    pub fn candidates(&self, request: &QuizRequest) -> ServiceResult<Vec<Question>> {
        let query = QuestionListQuery::from(request.candidate_filter());
        Ok(self.questions.list_questions(&query)?)
    }

    /// Draws the next question using the thread-local RNG.
    pub fn next_question(&self, request: &QuizRequest) -> ServiceResult<Question> {
        self.next_question_with(request, &mut rand::thread_rng())
    }

    /// Draws the next question using the provided RNG.
    pub fn next_question_with<G: Rng + ?Sized>(
        &self,
        request: &QuizRequest,
        rng: &mut G,
    ) -> ServiceResult<Question> {
        let candidates = self.candidates(request)?;
        let candidate_count = candidates.len();

        let picked = choose_candidate(candidates, rng);
        info!(
            "event=quiz_select module=service status={} candidates={} excluded={} category={}",
            if picked.is_some() { "ok" } else { "exhausted" },
            candidate_count,
            request.previous_questions.len(),
            request.category
        );
        picked.ok_or(ServiceError::NoQuestionsAvailable)
    }
}

/// Uniformly picks one candidate, or `None` for an empty set.
pub fn choose_candidate<G: Rng + ?Sized>(
    mut candidates: Vec<Question>,
    rng: &mut G,
) -> Option<Question> {
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}
