//! Route handlers.
//!
//! Each handler parses its input, locks the shared connection for one
//! service call, and maps the outcome to a JSON envelope or an [`ApiError`].

use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use trivia_core::{
    CategoryCatalog, CategoryConstraint, CategoryId, NewQuestion, PageRequest, Question,
    QuestionId, QuestionService, QuizRequest, QuizSelector, ServiceError,
    SqliteCategoryRepository, SqliteQuestionRepository,
};

const ANY_CATEGORY_TYPE: &str = "click";

type SqliteQuestionService<'conn> =
    QuestionService<SqliteQuestionRepository<'conn>, SqliteCategoryRepository<'conn>>;

/// Integer that clients may send either as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntOrText {
    Int(i64),
    Text(String),
}

impl IntOrText {
    fn to_i64(&self, field: &str) -> Result<i64, ApiError> {
        match self {
            Self::Int(value) => Ok(*value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("`{field}` must be an integer"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<i64>,
    per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionBody {
    question: Option<String>,
    answer: Option<String>,
    difficulty: Option<IntOrText>,
    category: Option<IntOrText>,
}

impl CreateQuestionBody {
    fn into_submission(self) -> Result<NewQuestion, ApiError> {
        Ok(NewQuestion {
            question: self.question,
            answer: self.answer,
            difficulty: self
                .difficulty
                .map(|value| value.to_i64("difficulty"))
                .transpose()?,
            category: self
                .category
                .map(|value| value.to_i64("category"))
                .transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    #[serde(rename = "searchTerm", alias = "search_term")]
    search_term: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizBody {
    #[serde(default, alias = "previousQuestions")]
    previous_questions: Option<Vec<QuestionId>>,
    #[serde(default, alias = "quizCategory")]
    quiz_category: Option<QuizCategoryBody>,
}

#[derive(Debug, Deserialize)]
pub struct QuizCategoryBody {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<IntOrText>,
}

impl QuizCategoryBody {
    /// `type == "click"` selects every category; anything else pins `id`.
    fn constraint(&self) -> Result<CategoryConstraint, ApiError> {
        if self.kind.as_deref() == Some(ANY_CATEGORY_TYPE) {
            return Ok(CategoryConstraint::Any);
        }
        match (&self.kind, &self.id) {
            (_, Some(id)) => Ok(CategoryConstraint::Only(id.to_i64("quiz_category.id")?)),
            (None, None) => Ok(CategoryConstraint::Any),
            (Some(kind), None) => Err(ApiError::BadRequest(format!(
                "quiz_category of type `{kind}` needs an id"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<CategoryId, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPageResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: u64,
    categories: BTreeMap<CategoryId, String>,
    current_category: Option<CategoryId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionListResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: u64,
    current_category: Option<CategoryId>,
}

impl QuestionListResponse {
    fn new(questions: Vec<Question>, current_category: Option<CategoryId>) -> Self {
        Self {
            success: true,
            total_questions: questions.len() as u64,
            questions,
            current_category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    success: bool,
    question: Question,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    success: bool,
    created: QuestionId,
    question: Question,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    success: bool,
    deleted: QuestionId,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    success: bool,
    question: Option<Question>,
}

fn question_service(conn: &Connection) -> Result<SqliteQuestionService<'_>, ApiError> {
    Ok(QuestionService::new(
        SqliteQuestionRepository::try_new(conn)?,
        SqliteCategoryRepository::try_new(conn)?,
    ))
}

fn category_catalog(
    conn: &Connection,
) -> Result<CategoryCatalog<SqliteCategoryRepository<'_>>, ApiError> {
    Ok(CategoryCatalog::new(SqliteCategoryRepository::try_new(conn)?))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn index() -> &'static str {
    "Trivia API is running"
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".to_string())
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let categories = state.with_conn(|conn| Ok(category_catalog(conn)?.list_all()?))?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

/// `GET /questions`: newest-first page with the category map.
///
/// A page past the end of a non-empty list is a 404.
pub async fn list_questions(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<QuestionPageResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let request = PageRequest::new(params.page, params.per_page);

    let (page, categories) = state.with_conn(|conn| {
        let page = question_service(conn)?.list_questions(request)?;
        let categories = category_catalog(conn)?.list_all()?;
        Ok((page, categories))
    })?;

    if page.is_out_of_range() {
        return Err(ApiError::NotFound(format!(
            "page {} is beyond {} question(s)",
            page.page, page.total_count
        )));
    }

    Ok(Json(QuestionPageResponse {
        success: true,
        questions: page.items,
        total_questions: page.total_count,
        categories,
        current_category: None,
    }))
}

pub async fn get_question(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let id = path_id(path)?;
    let question = state.with_conn(|conn| Ok(question_service(conn)?.get_question(id)?))?;
    Ok(Json(QuestionResponse {
        success: true,
        question,
    }))
}

pub async fn create_question(
    State(state): State<AppState>,
    body: Result<Json<CreateQuestionBody>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let submission = json_body(body)?.into_submission()?;
    let question =
        state.with_conn(|conn| Ok(question_service(conn)?.create_question(&submission)?))?;
    Ok(Json(CreatedResponse {
        success: true,
        created: question.id,
        question,
    }))
}

/// `DELETE /questions/:id`: a missing id is 422, not a silent success.
pub async fn delete_question(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = path_id(path)?;
    state.with_conn(|conn| {
        question_service(conn)?
            .delete_question(id)
            .map_err(|err| match err {
                ServiceError::NotFound(id) => {
                    ApiError::Unprocessable(format!("question {id} does not exist"))
                }
                other => other.into(),
            })
    })?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
    }))
}

pub async fn search_questions(
    State(state): State<AppState>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<QuestionListResponse>, ApiError> {
    let term = json_body(body)?
        .search_term
        .ok_or_else(|| ApiError::BadRequest("missing `searchTerm`".to_string()))?;
    let questions = state.with_conn(|conn| Ok(question_service(conn)?.search_questions(&term)?))?;
    Ok(Json(QuestionListResponse::new(questions, None)))
}

pub async fn questions_by_category(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<QuestionListResponse>, ApiError> {
    let category = path_id(path)?;
    let questions =
        state.with_conn(|conn| Ok(question_service(conn)?.questions_by_category(category)?))?;
    Ok(Json(QuestionListResponse::new(questions, Some(category))))
}

/// `POST /quizzes`: one random unseen question, or `null` when none is left.
pub async fn next_quiz_question(
    State(state): State<AppState>,
    body: Result<Json<QuizBody>, JsonRejection>,
) -> Result<Json<QuizResponse>, ApiError> {
    let body = json_body(body)?;
    let category = match &body.quiz_category {
        Some(quiz_category) => quiz_category.constraint()?,
        None => CategoryConstraint::Any,
    };
    let request = QuizRequest::new(body.previous_questions.unwrap_or_default(), category);

    let question = state.with_conn(|conn| {
        let selector = QuizSelector::new(SqliteQuestionRepository::try_new(conn)?);
        match selector.next_question(&request) {
            Ok(question) => Ok(Some(question)),
            Err(ServiceError::NoQuestionsAvailable) => Ok(None),
            Err(err) => Err(err.into()),
        }
    })?;

    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    info!(
        "event=http_request module=server method={method} path={path} status={} duration_ms={}",
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
