//! Conversions between SQLite rows and catalog types, plus the `LIKE`
//! pattern encoding used by both searches.

use movielens_core::movie::{Movie, MovieSummary, RatingSummary};

/// Escape character declared in every `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Wrap `needle` as a substring pattern, escaping wildcards so that `%` and
/// `_` in user input match themselves.
pub fn encode_substring_pattern(needle: &str) -> String {
  let mut pattern = String::with_capacity(needle.len() + 2);
  pattern.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | LIKE_ESCAPE) {
      pattern.push(LIKE_ESCAPE);
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

/// Columns: `movie_id, title, year, external_id`.
pub fn decode_movie(row: &rusqlite::Row<'_>) -> rusqlite::Result<Movie> {
  Ok(Movie {
    movie_id:    row.get(0)?,
    title:       row.get(1)?,
    year:        row.get(2)?,
    external_id: row.get(3)?,
  })
}

/// Columns: `movie_id, title, year`.
pub fn decode_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<MovieSummary> {
  Ok(MovieSummary {
    movie_id: row.get(0)?,
    title:    row.get(1)?,
    year:     row.get(2)?,
  })
}

/// Columns: `AVG(rating), COUNT(rating)`. SQLite's `AVG` over zero rows is
/// `NULL`, which maps straight onto `average: None`.
pub fn decode_rating_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<RatingSummary> {
  let count: i64 = row.get(1)?;
  Ok(RatingSummary {
    average: row.get(0)?,
    count:   count as u64,
  })
}

/// True when `err` is SQLite rejecting a row for a missing parent.
pub fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
  )
}

/// True when `err` is SQLite rejecting a second row with the same key.
/// `INTEGER PRIMARY KEY` columns report the primary-key code, other
/// unique indexes the unique code.
pub fn is_duplicate_key(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}
