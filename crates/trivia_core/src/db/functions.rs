//! Application-defined SQL functions registered on every opened connection.

use super::DbResult;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// SQL name of the Unicode case fold used by question search.
pub(crate) const FOLD_CASE_FN: &str = "trivia_fold_case";

/// Case fold shared by SQL search and in-memory filtering.
///
/// Full Unicode lowercase, unlike SQLite's ASCII-only `LIKE`/`lower()`.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

pub(super) fn register_functions(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|value| fold_case(&value)))
        },
    )?;
    Ok(())
}
