//! SQL schema for the catalog store.
//!
//! Table names follow the entity names. Identity columns on `GenreTag` and
//! `Rating` are `INTEGER PRIMARY KEY` aliases of the rowid, so inserting
//! `NULL` assigns the next id.

/// Run once per connection. Foreign keys are off by default in SQLite and
/// cannot be toggled inside a transaction.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
/// Parents are created before the children that reference them.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS Movie (
    movie_id    INTEGER PRIMARY KEY,
    title       TEXT    NOT NULL,
    year        INTEGER NOT NULL,
    external_id INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS GenreTag (
    tag_id      INTEGER PRIMARY KEY,
    movie_id    INTEGER NOT NULL REFERENCES Movie(movie_id),
    genre       TEXT    NOT NULL
);

-- Only table written after the bulk load; rows are appended, never updated.
CREATE TABLE IF NOT EXISTS Rating (
    rating_id   INTEGER PRIMARY KEY,
    movie_id    INTEGER NOT NULL REFERENCES Movie(movie_id),
    rating      INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS genre_tag_movie_idx ON GenreTag(movie_id);
CREATE INDEX IF NOT EXISTS genre_tag_genre_idx ON GenreTag(genre);
CREATE INDEX IF NOT EXISTS rating_movie_idx    ON Rating(movie_id);
";

/// Children before the parent they reference.
pub const DROP_TABLES: &str = "
DROP TABLE IF EXISTS GenreTag;
DROP TABLE IF EXISTS Rating;
DROP TABLE IF EXISTS Movie;
";
