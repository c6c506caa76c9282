//! Question repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/delete and filtered, windowed reads over `questions`.
//! - Keep SQL composition (search, category, exclusion) inside this module.
//!
//! # Invariants
//! - Reads are always ordered newest-first (`id DESC`).
//! - Writes validate the submission before touching SQL.
//! - Deleting a missing id is `NotFound`, including a retried delete.

use crate::db::{ensure_tables, fold_case, DbError, FOLD_CASE_FN};
use crate::model::category::CategoryId;
use crate::model::question::{NewQuestion, Question, QuestionId, QuestionValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const QUESTION_SELECT_SQL: &str = "SELECT
    id,
    question,
    answer,
    difficulty,
    category
FROM questions";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for question/category persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(QuestionValidationError),
    Db(DbError),
    NotFound(QuestionId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "question not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted trivia data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<QuestionValidationError> for RepoError {
    fn from(value: QuestionValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row predicate shared by every question read.
///
/// An empty filter matches all questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    /// Case-insensitive substring of the question text. An empty or
    /// all-whitespace term means "any"; otherwise the term is used verbatim.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<CategoryId>,
    /// Ids that must not be returned.
    pub exclude: BTreeSet<QuestionId>,
}

impl QuestionFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn category(category: CategoryId) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// Evaluates the filter against one question.
    ///
    /// This is the reference semantics; the SQLite implementation pushes the
    /// same predicate into SQL.
    pub fn matches(&self, question: &Question) -> bool {
        if self.exclude.contains(&question.id) {
            return false;
        }
        if let Some(category) = self.category {
            if question.category != category {
                return false;
            }
        }
        match self.search_term() {
            Some(term) => fold_case(&question.question).contains(&fold_case(term)),
            None => true,
        }
    }

    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .filter(|term| !term.trim().is_empty())
    }
}

/// Filter plus result window.
#[derive(Debug, Clone, Default)]
pub struct QuestionListQuery {
    pub filter: QuestionFilter,
    /// `None` returns every matching row.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl From<QuestionFilter> for QuestionListQuery {
    fn from(filter: QuestionFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

/// Repository interface for question persistence.
pub trait QuestionRepository {
    /// Validates and stores a submission, returning the stored record.
    fn create_question(&self, submission: &NewQuestion) -> RepoResult<Question>;
    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>>;
    /// Removes one question; `NotFound` when it does not exist.
    fn delete_question(&self, id: QuestionId) -> RepoResult<()>;
    /// Lists matching questions newest-first inside the requested window.
    fn list_questions(&self, query: &QuestionListQuery) -> RepoResult<Vec<Question>>;
    /// Counts every question matching the filter, ignoring any window.
    fn count_questions(&self, filter: &QuestionFilter) -> RepoResult<u64>;
}

/// SQLite-backed question repository.
pub struct SqliteQuestionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionRepository<'conn> {
    /// Wraps a migrated connection; fails when the schema is not in place.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["categories", "questions"])?;
        Ok(Self { conn })
    }
}

impl QuestionRepository for SqliteQuestionRepository<'_> {
    fn create_question(&self, submission: &NewQuestion) -> RepoResult<Question> {
        let draft = submission.validate()?;

        self.conn.execute(
            "INSERT INTO questions (question, answer, difficulty, category)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.question.as_str(),
                draft.answer.as_str(),
                draft.difficulty,
                draft.category,
            ],
        )?;

        Ok(Question {
            id: self.conn.last_insert_rowid(),
            question: draft.question,
            answer: draft.answer,
            difficulty: draft.difficulty,
            category: draft.category,
        })
    }

    fn get_question(&self, id: QuestionId) -> RepoResult<Option<Question>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{QUESTION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_question_row(row)?));
        }
        Ok(None)
    }

    fn delete_question(&self, id: QuestionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM questions WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_questions(&self, query: &QuestionListQuery) -> RepoResult<Vec<Question>> {
        let (where_sql, mut bind_values) = build_where_clause(&query.filter)?;
        let mut sql = format!("{QUESTION_SELECT_SQL}{where_sql} ORDER BY id DESC");

        match query.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                bind_values.push(Value::Integer(i64::from(limit)));
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
            None if query.offset > 0 => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
            None => {}
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut questions = Vec::new();
        while let Some(row) = rows.next()? {
            questions.push(parse_question_row(row)?);
        }
        Ok(questions)
    }

    fn count_questions(&self, filter: &QuestionFilter) -> RepoResult<u64> {
        let (where_sql, bind_values) = build_where_clause(filter)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM questions{where_sql};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
    }
}

fn build_where_clause(filter: &QuestionFilter) -> RepoResult<(String, Vec<Value>)> {
    let mut clauses: Vec<String> = Vec::new();
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(term) = filter.search_term() {
        clauses.push(format!("instr({FOLD_CASE_FN}(question), ?) > 0"));
        bind_values.push(Value::Text(fold_case(term)));
    }

    if let Some(category) = filter.category {
        clauses.push("category = ?".to_string());
        bind_values.push(Value::Integer(category));
    }

    // Bound as one JSON array: SQLite caps a statement at 32766 variables.
    if !filter.exclude.is_empty() {
        let excluded = serde_json::to_string(&filter.exclude)
            .map_err(|err| RepoError::InvalidData(format!("exclusion set: {err}")))?;
        clauses.push("id NOT IN (SELECT value FROM json_each(?))".to_string());
        bind_values.push(Value::Text(excluded));
    }

    if clauses.is_empty() {
        return Ok((String::new(), bind_values));
    }
    Ok((format!(" WHERE {}", clauses.join(" AND ")), bind_values))
}

fn parse_question_row(row: &Row<'_>) -> RepoResult<Question> {
    let question = Question {
        id: row.get("id")?,
        question: row.get("question")?,
        answer: row.get("answer")?,
        difficulty: row.get("difficulty")?,
        category: row.get("category")?,
    };
    if question.difficulty < 1 {
        return Err(RepoError::InvalidData(format!(
            "difficulty `{}` in questions.difficulty for id {}",
            question.difficulty, question.id
        )));
    }
    Ok(question)
}

#[cfg(test)]
mod tests {
    use super::{build_where_clause, QuestionFilter};
    use rusqlite::types::Value;
    use crate::model::question::Question;

    fn sample(id: i64, text: &str, category: i64) -> Question {
        Question {
            id,
            question: text.to_string(),
            answer: "answer".to_string(),
            difficulty: 1,
            category,
        }
    }

    #[test]
    fn empty_filter_matches_everything_and_has_no_where_clause() {
        let filter = QuestionFilter::default();
        assert!(filter.matches(&sample(1, "anything", 3)));
        let (sql, values) = build_where_clause(&filter).unwrap();
        assert!(sql.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn blank_search_term_is_ignored() {
        for term in ["", "   "] {
            let filter = QuestionFilter::search(term);
            assert!(filter.matches(&sample(1, "anything", 3)));
            assert!(build_where_clause(&filter).unwrap().0.is_empty());
        }
    }

    #[test]
    fn search_term_is_not_trimmed() {
        let filter = QuestionFilter::search("cat ");
        assert!(!filter.matches(&sample(1, "Which category?", 3)));
        assert!(filter.matches(&sample(2, "A cat sat", 3)));
    }

    #[test]
    fn filter_combines_search_category_and_exclusion() {
        let mut filter = QuestionFilter::search("TITLE");
        filter.category = Some(4);
        filter.exclude.insert(2);

        assert!(filter.matches(&sample(1, "Whose title is this?", 4)));
        assert!(!filter.matches(&sample(2, "Whose title is this?", 4)));
        assert!(!filter.matches(&sample(3, "Whose title is this?", 5)));
        assert!(!filter.matches(&sample(4, "No match here", 4)));

        let (sql, values) = build_where_clause(&filter).unwrap();
        assert_eq!(
            sql,
            " WHERE instr(trivia_fold_case(question), ?) > 0 AND category = ? \
             AND id NOT IN (SELECT value FROM json_each(?))"
        );
        assert_eq!(
            values,
            vec![
                Value::Text("title".to_string()),
                Value::Integer(4),
                Value::Text("[2]".to_string()),
            ]
        );
    }

    #[test]
    fn exclusion_set_binds_as_a_single_parameter() {
        let filter = QuestionFilter {
            exclude: (1..=40_000).collect(),
            ..QuestionFilter::default()
        };
        let (_, values) = build_where_clause(&filter).unwrap();
        assert_eq!(values.len(), 1);
    }
}
