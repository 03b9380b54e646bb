//! Subject key inference.
//!
//! Sources never agree on what the identifier column is called, so the key
//! is inferred per table: well-known spellings first, then a heuristic scan
//! over column names.

use crate::table::Table;

/// Known spellings of the subject identifier column, highest priority first
pub const SUBJECT_KEY_ALIASES: [&str; 6] =
    ["USERID", "user_id", "userID", "UserID", "userId", "id"];

/// Find the subject key column of a table
///
/// Tries each alias in [`SUBJECT_KEY_ALIASES`] as an exact column name, then
/// falls back to the first column whose lowercase name contains both `user`
/// and `id`.
///
/// # Returns
/// * `Option<&str>` - The matching column name, or `None` when the table has
///   no recognizable key
#[must_use]
pub fn infer_key(table: &Table) -> Option<&str> {
    for alias in SUBJECT_KEY_ALIASES {
        if table.has_column(alias) {
            return Some(alias);
        }
    }

    table
        .column_names()
        .iter()
        .map(String::as_str)
        .find(|name| {
            let lc = name.to_lowercase();
            lc.contains("user") && lc.contains("id")
        })
}
