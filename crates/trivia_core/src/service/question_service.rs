//! Question use-case service.
//!
//! # Responsibility
//! - Paginated newest-first listing, point lookup, search and per-category
//!   listing.
//! - Create with full validation (including category existence) and delete
//!   with explicit not-found reporting.
//!
//! # Invariants
//! - A create never succeeds for a category that does not exist.
//! - A delete of a missing id is `ServiceError::NotFound`, never success.

use crate::model::category::CategoryId;
use crate::model::question::{NewQuestion, Question, QuestionId, QuestionValidationError};
use crate::pagination::{paginate_with, Page, PageRequest};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::question_repo::{QuestionFilter, QuestionListQuery, QuestionRepository};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

/// Question service over injected repositories.
pub struct QuestionService<Q: QuestionRepository, C: CategoryRepository> {
    questions: Q,
    categories: C,
}

impl<Q: QuestionRepository, C: CategoryRepository> QuestionService<Q, C> {
    pub fn new(questions: Q, categories: C) -> Self {
        Self {
            questions,
            categories,
        }
    }

    /// Returns one newest-first page of all questions.
    ///
    /// An out-of-range page is an empty window, not an error.
    pub fn list_questions(&self, request: PageRequest) -> ServiceResult<Page<Question>> {
        self.page_of(QuestionFilter::default(), request)
    }

    /// Returns one page of questions matching `filter`.
    pub fn page_of(
        &self,
        filter: QuestionFilter,
        request: PageRequest,
    ) -> ServiceResult<Page<Question>> {
        let page = paginate_with(
            request,
            || self.questions.count_questions(&filter),
            |offset, limit| {
                self.questions.list_questions(&QuestionListQuery {
                    filter: filter.clone(),
                    limit: Some(limit),
                    offset,
                })
            },
        )?;
        Ok(page)
    }

    pub fn get_question(&self, id: QuestionId) -> ServiceResult<Question> {
        self.questions
            .get_question(id)?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Validates and stores a new question.
    ///
    /// # Errors
    /// - `Validation` for missing/blank fields, non-positive difficulty or an
    ///   unknown category.
    /// - `Store` when persistence fails.
    pub fn create_question(&self, submission: &NewQuestion) -> ServiceResult<Question> {
        let draft = submission.validate().map_err(|err| {
            warn!("event=question_create module=service status=rejected reason=\"{err}\"");
            err
        })?;
        if self.categories.get_category(draft.category)?.is_none() {
            warn!(
                "event=question_create module=service status=rejected reason=unknown_category category={}",
                draft.category
            );
            return Err(QuestionValidationError::UnknownCategory(draft.category).into());
        }

        let question = self.questions.create_question(submission)?;
        info!(
            "event=question_create module=service status=ok question_id={} category={}",
            question.id, question.category
        );
        Ok(question)
    }

    pub fn delete_question(&self, id: QuestionId) -> ServiceResult<()> {
        match self.questions.delete_question(id) {
            Ok(()) => {
                info!("event=question_delete module=service status=ok question_id={id}");
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=question_delete module=service status=error question_id={id} error={err}"
                );
                Err(err.into())
            }
        }
    }

    /// Case-insensitive substring search over question text.
    ///
    /// The term is matched as given. An empty or all-whitespace term returns
    /// every question; no match returns an empty list.
    pub fn search_questions(&self, term: &str) -> ServiceResult<Vec<Question>> {
        let query = QuestionListQuery::from(QuestionFilter::search(term));
        Ok(self.questions.list_questions(&query)?)
    }

    /// Lists every question in one category; an unknown id yields no rows.
    pub fn questions_by_category(&self, category: CategoryId) -> ServiceResult<Vec<Question>> {
        let query = QuestionListQuery::from(QuestionFilter::category(category));
        Ok(self.questions.list_questions(&query)?)
    }
}
