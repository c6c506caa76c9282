//! SQLite storage bootstrap for the trivia store.
//!
//! # Responsibility
//! - Open and configure SQLite connections for question/category storage.
//! - Apply schema migrations (including the category seed) in order.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No repository touches a connection before migrations succeed.
//! - `foreign_keys` is enabled so `questions.category` must reference a row
//!   in `categories`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod functions;
pub mod migrations;
mod open;

pub use functions::fold_case;
pub(crate) use functions::FOLD_CASE_FN;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection was handed to a repository before migrations created this table.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "trivia schema version {db_version} is newer than this build supports ({latest_supported})"
            ),
            Self::MissingTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Fails with [`DbError::MissingTable`] unless every named table exists.
pub(crate) fn ensure_tables(conn: &rusqlite::Connection, tables: &[&'static str]) -> DbResult<()> {
    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(DbError::MissingTable(table));
        }
    }
    Ok(())
}
