//! Operator probe for a trivia database.
//!
//! # Responsibility
//! - Verify `trivia_core` linkage (`trivia_cli` with no arguments).
//! - Inspect a database file without running the HTTP server.
//!
//! Usage: `trivia_cli [categories | questions [page] | quiz [category_id]]`
//! against `TRIVIA_DB_PATH` (default `<temp_dir>/trivia.sqlite3`).

use std::path::PathBuf;
use std::process::ExitCode;
use trivia_core::db::open_db;
use trivia_core::{
    CategoryCatalog, CategoryConstraint, PageRequest, QuestionService, QuizRequest, QuizSelector,
    ServiceError, SqliteCategoryRepository, SqliteQuestionRepository,
};

const DB_PATH_VAR: &str = "TRIVIA_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "trivia.sqlite3";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("trivia_core ping={}", trivia_core::ping());
        println!("trivia_core version={}", trivia_core::core_version());
        return ExitCode::SUCCESS;
    };

    match run(command, args.get(1).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("trivia_cli {command} failed: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &str, arg: Option<&str>) -> Result<(), String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("open `{}`: {err}", db_path.display()))?;
    let questions = SqliteQuestionRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let categories = SqliteCategoryRepository::try_new(&conn).map_err(|err| err.to_string())?;

    match command {
        "categories" => {
            let all = CategoryCatalog::new(categories)
                .list_all()
                .map_err(|err| err.to_string())?;
            for (id, label) in all {
                println!("{id}\t{label}");
            }
        }
        "questions" => {
            let page = parse_arg(arg, "page")?;
            let listed = QuestionService::new(questions, categories)
                .list_questions(PageRequest::new(page, None))
                .map_err(|err| err.to_string())?;
            for question in &listed.items {
                println!(
                    "{}\t[cat {} / diff {}]\t{}",
                    question.id, question.category, question.difficulty, question.question
                );
            }
            println!(
                "page {} ({} shown, {} total)",
                listed.page,
                listed.items.len(),
                listed.total_count
            );
        }
        "quiz" => {
            let category = match parse_arg(arg, "category_id")? {
                Some(id) => CategoryConstraint::Only(id),
                None => CategoryConstraint::Any,
            };
            let request = QuizRequest {
                category,
                ..QuizRequest::default()
            };
            match QuizSelector::new(questions).next_question(&request) {
                Ok(question) => println!(
                    "{}\t{}\n\t-> {}",
                    question.id, question.question, question.answer
                ),
                Err(ServiceError::NoQuestionsAvailable) => println!("no questions available"),
                Err(err) => return Err(err.to_string()),
            }
        }
        other => {
            return Err(format!(
                "unknown command `{other}`; expected categories|questions|quiz"
            ));
        }
    }
    Ok(())
}

fn parse_arg(arg: Option<&str>, name: &str) -> Result<Option<i64>, String> {
    arg.map(|raw| {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| format!("`{name}` must be an integer, got `{raw}`"))
    })
    .transpose()
}

fn resolve_db_path() -> PathBuf {
    match std::env::var(DB_PATH_VAR) {
        Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
    }
}
