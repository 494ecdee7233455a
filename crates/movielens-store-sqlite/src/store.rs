//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use movielens_core::{
  movie::{CatalogCounts, Movie, MovieId, MovieSummary, Rating, RatingSummary},
  source::{CatalogSource, SourceSet},
  store::CatalogStore,
};

use crate::{
  Error, Result,
  encode::{
    decode_movie, decode_rating_summary, decode_summary, encode_substring_pattern,
    is_duplicate_key, is_foreign_key_violation,
  },
  schema::{CONNECTION_PRAGMAS, CREATE_TABLES, DROP_TABLES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and every
/// clone talks to the same database thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`. Tables are created if missing but
  /// not populated; call [`CatalogStore::initialize`] to load data.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.prepare_connection().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.prepare_connection().await?;
    Ok(store)
  }

  /// Shut down the database thread. Other clones fail with
  /// [`Error::Database`] afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn prepare_connection(&self) -> Result<()> {
    self
      .conn
      .call(|conn| Ok(prepare_connection(conn)))
      .await??;
    Ok(())
  }

  /// Replace the catalog with already-parsed records in one transaction.
  /// A repeated `movie_id` fails with [`Error::DuplicateMovie`] and leaves
  /// the previous catalog in place.
  pub async fn load(&self, source: CatalogSource) -> Result<CatalogCounts> {
    let counts = self
      .conn
      .call(move |conn| Ok(reload(conn, &source)))
      .await??;
    log_loaded(&counts);
    Ok(counts)
  }

  /// Shared body of both searches: `sql` takes the `LIKE` pattern as `?1`
  /// and selects `movie_id, title, year`.
  async fn search(&self, sql: &'static str, needle: &str) -> Result<Vec<MovieSummary>> {
    let pattern = encode_substring_pattern(needle);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], decode_summary)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }
}

fn log_loaded(counts: &CatalogCounts) {
  tracing::info!(
    movies = counts.movies,
    genre_tags = counts.genre_tags,
    ratings = counts.ratings,
    "catalog loaded"
  );
}

// ─── Connection-thread helpers ───────────────────────────────────────────────
//
// These run inside `Connection::call` and return the crate error directly,
// so the caller unwraps two layers: the channel, then the operation.

/// Enable foreign keys, confirm SQLite honoured the pragma, and create any
/// missing tables.
fn prepare_connection(conn: &mut rusqlite::Connection) -> Result<()> {
  conn.execute_batch(CONNECTION_PRAGMAS)?;

  let enforced: Option<i64> = conn
    .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
    .optional()?;
  if enforced != Some(1) {
    return Err(Error::ForeignKeysDisabled);
  }

  conn.execute_batch(CREATE_TABLES).map_err(Error::Schema)?;
  Ok(())
}

/// Drop, recreate and repopulate every table. The transaction rolls back on
/// any early return, leaving the previous catalog in place.
fn reload(conn: &mut rusqlite::Connection, source: &CatalogSource) -> Result<CatalogCounts> {
  let tx = conn.transaction()?;

  tx.execute_batch(DROP_TABLES).map_err(Error::Schema)?;
  tx.execute_batch(CREATE_TABLES).map_err(Error::Schema)?;

  {
    let mut insert_movie = tx.prepare(
      "INSERT INTO Movie (movie_id, title, year, external_id) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for m in &source.movies {
      insert_movie
        .execute(rusqlite::params![m.movie_id, m.title, m.year, m.external_id])
        .map_err(|e| duplicate_movie(e, m.movie_id))?;
    }

    let mut insert_tag = tx.prepare(
      "INSERT INTO GenreTag (tag_id, movie_id, genre) VALUES (NULL, ?1, ?2)",
    )?;
    for g in &source.genre_tags {
      insert_tag
        .execute(rusqlite::params![g.movie_id, g.genre])
        .map_err(|e| missing_parent(e, g.movie_id))?;
    }

    let mut insert_rating = tx.prepare(
      "INSERT INTO Rating (rating_id, movie_id, rating) VALUES (NULL, ?1, ?2)",
    )?;
    for r in &source.ratings {
      insert_rating
        .execute(rusqlite::params![r.movie_id, r.rating])
        .map_err(|e| missing_parent(e, r.movie_id))?;
    }
  }

  let counts = count_rows(&tx)?;
  tx.commit()?;
  Ok(counts)
}

/// Check the parent and append in one transaction. The existence check gives
/// a precise error; the foreign key backs it up.
fn insert_rating(conn: &mut rusqlite::Connection, movie_id: MovieId, rating: i64) -> Result<Rating> {
  let tx = conn.transaction()?;

  let exists = tx
    .query_row(
      "SELECT 1 FROM Movie WHERE movie_id = ?1",
      rusqlite::params![movie_id],
      |_| Ok(()),
    )
    .optional()?
    .is_some();
  if !exists {
    return Err(Error::ReferentialIntegrity(movie_id));
  }

  tx.execute(
    "INSERT INTO Rating (rating_id, movie_id, rating) VALUES (NULL, ?1, ?2)",
    rusqlite::params![movie_id, rating],
  )
  .map_err(|e| missing_parent(e, movie_id))?;
  let rating_id = tx.last_insert_rowid();

  tx.commit()?;
  Ok(Rating { rating_id, movie_id, rating })
}

fn count_rows(conn: &rusqlite::Connection) -> Result<CatalogCounts> {
  let counts = conn.query_row(
    "SELECT
       (SELECT COUNT(*) FROM Movie),
       (SELECT COUNT(*) FROM GenreTag),
       (SELECT COUNT(*) FROM Rating)",
    [],
    |row| {
      Ok(CatalogCounts {
        movies:     row.get::<_, i64>(0)? as u64,
        genre_tags: row.get::<_, i64>(1)? as u64,
        ratings:    row.get::<_, i64>(2)? as u64,
      })
    },
  )?;
  Ok(counts)
}

fn duplicate_movie(err: rusqlite::Error, movie_id: MovieId) -> Error {
  if is_duplicate_key(&err) {
    Error::DuplicateMovie(movie_id)
  } else {
    Error::Sqlite(err)
  }
}

fn missing_parent(err: rusqlite::Error, movie_id: MovieId) -> Error {
  if is_foreign_key_violation(&err) {
    Error::ReferentialIntegrity(movie_id)
  } else {
    Error::Sqlite(err)
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  async fn initialize(&self, sources: &SourceSet) -> Result<CatalogCounts> {
    let sources = sources.clone();

    // Source files are read on the database thread, off the async runtime.
    let counts = self
      .conn
      .call(move |conn| {
        Ok(
          CatalogSource::read(&sources)
            .map_err(Error::from)
            .and_then(|source| reload(conn, &source)),
        )
      })
      .await??;

    log_loaded(&counts);
    Ok(counts)
  }

  // ── Searches ──────────────────────────────────────────────────────────────

  async fn search_by_title(&self, substring: &str) -> Result<Vec<MovieSummary>> {
    self
      .search(
        "SELECT movie_id, title, year
         FROM Movie
         WHERE title LIKE ?1 ESCAPE '\\'
         ORDER BY title, year, movie_id",
        substring,
      )
      .await
  }

  async fn search_by_genre(&self, genre: &str) -> Result<Vec<MovieSummary>> {
    self
      .search(
        "SELECT m.movie_id, m.title, m.year
         FROM GenreTag g
         JOIN Movie m ON m.movie_id = g.movie_id
         WHERE g.genre LIKE ?1 ESCAPE '\\'
         ORDER BY m.title, m.year, m.movie_id",
        genre,
      )
      .await
  }

  // ── Per-movie reads ───────────────────────────────────────────────────────

  async fn get_movie_detail(&self, movie_id: MovieId) -> Result<Option<Movie>> {
    let movie = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT movie_id, title, year, external_id FROM Movie WHERE movie_id = ?1",
              rusqlite::params![movie_id],
              decode_movie,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(movie)
  }

  async fn get_rating_summary(&self, movie_id: MovieId) -> Result<RatingSummary> {
    let summary = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT AVG(rating), COUNT(rating) FROM Rating WHERE movie_id = ?1",
          rusqlite::params![movie_id],
          decode_rating_summary,
        )?)
      })
      .await?;

    Ok(summary)
  }

  async fn get_genres(&self, movie_id: MovieId) -> Result<Vec<String>> {
    let genres = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT genre FROM GenreTag WHERE movie_id = ?1 ORDER BY tag_id")?;
        let rows = stmt
          .query_map(rusqlite::params![movie_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(genres)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn submit_rating(&self, movie_id: MovieId, rating: i64) -> Result<Rating> {
    let stored = self
      .conn
      .call(move |conn| Ok(insert_rating(conn, movie_id, rating)))
      .await??;

    tracing::debug!(movie_id, rating, rating_id = stored.rating_id, "rating submitted");
    Ok(stored)
  }

  // ── Catalog-wide ──────────────────────────────────────────────────────────

  async fn list_distinct_genres(&self) -> Result<Vec<String>> {
    let genres = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT DISTINCT genre FROM GenreTag ORDER BY genre")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(genres)
  }

  async fn catalog_counts(&self) -> Result<CatalogCounts> {
    Ok(self.conn.call(|conn| Ok(count_rows(conn))).await??)
  }
}
