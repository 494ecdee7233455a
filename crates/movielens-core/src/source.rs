//! Tab-separated source files for the bulk load.
//!
//! Each file starts with a header line (discarded) followed by one record
//! per line. Records are checked for their exact field count and then
//! deserialised column by column, so a malformed line fails with
//! [`Error::SourceFormat`] before anything reaches the store.

use std::{
  collections::HashSet,
  fs::File,
  io::Read,
  path::{Path, PathBuf},
};

use serde::{Deserialize, de::DeserializeOwned};

use crate::{Error, Result, movie::MovieId};

pub const MOVIES_FILE: &str = "movies.tsv";
pub const GENRES_FILE: &str = "genres.tsv";
pub const RATINGS_FILE: &str = "ratings.tsv";

// ─── Location ────────────────────────────────────────────────────────────────

/// Where the three source files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
  pub movies:  PathBuf,
  pub genres:  PathBuf,
  pub ratings: PathBuf,
}

impl SourceSet {
  /// The conventional layout: `movies.tsv`, `genres.tsv` and `ratings.tsv`
  /// side by side in `dir`.
  pub fn in_dir(dir: impl AsRef<Path>) -> Self {
    let dir = dir.as_ref();
    Self {
      movies:  dir.join(MOVIES_FILE),
      genres:  dir.join(GENRES_FILE),
      ratings: dir.join(RATINGS_FILE),
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One line of `movies.tsv`: `movie_id, title, year, imdb_id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieRecord {
  pub movie_id:    MovieId,
  pub title:       String,
  pub year:        i64,
  pub external_id: i64,
}

/// One line of `genres.tsv`: `movie_id, genre`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenreTagRecord {
  pub movie_id: MovieId,
  pub genre:    String,
}

/// One line of `ratings.tsv`: `movie_id, rating`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RatingRecord {
  pub movie_id: MovieId,
  pub rating:   i64,
}

/// Fully parsed contents of a [`SourceSet`], ready to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSource {
  pub movies:     Vec<MovieRecord>,
  pub genre_tags: Vec<GenreTagRecord>,
  pub ratings:    Vec<RatingRecord>,
}

impl CatalogSource {
  /// Read and validate all three files.
  pub fn read(set: &SourceSet) -> Result<Self> {
    Self::from_readers(
      open(&set.movies)?,
      open(&set.genres)?,
      open(&set.ratings)?,
    )
  }

  /// Parse from arbitrary readers. Error messages name the conventional file
  /// names.
  pub fn from_readers(
    movies: impl Read,
    genres: impl Read,
    ratings: impl Read,
  ) -> Result<Self> {
    let movies = parse_movies(movies)?;
    let genre_tags = parse_tsv(genres, GENRES_FILE, 2)?;
    let ratings = parse_tsv(ratings, RATINGS_FILE, 2)?;
    Ok(Self { movies, genre_tags, ratings })
  }
}

fn open(path: &Path) -> Result<File> {
  File::open(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Movies additionally reject repeated ids, since `movie_id` is the primary
/// key every other file refers to.
fn parse_movies(reader: impl Read) -> Result<Vec<MovieRecord>> {
  let records: Vec<(u64, MovieRecord)> = parse_tsv_lines(reader, MOVIES_FILE, 4)?;

  let mut seen = HashSet::with_capacity(records.len());
  for (line, record) in &records {
    if !seen.insert(record.movie_id) {
      return Err(Error::SourceFormat {
        file:    MOVIES_FILE.to_owned(),
        line:    *line,
        message: format!("duplicate movie_id {}", record.movie_id),
      });
    }
  }

  Ok(records.into_iter().map(|(_, record)| record).collect())
}

fn parse_tsv<T: DeserializeOwned>(
  reader: impl Read,
  file: &str,
  columns: usize,
) -> Result<Vec<T>> {
  Ok(
    parse_tsv_lines(reader, file, columns)?
      .into_iter()
      .map(|(_, record)| record)
      .collect(),
  )
}

/// Parse every record after the header, pairing it with its line number.
fn parse_tsv_lines<T: DeserializeOwned>(
  reader: impl Read,
  file: &str,
  columns: usize,
) -> Result<Vec<(u64, T)>> {
  let mut reader = csv::ReaderBuilder::new()
    .delimiter(b'\t')
    .has_headers(true)
    .quoting(false)
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(reader);

  let format_error = |line: u64, message: String| Error::SourceFormat {
    file: file.to_owned(),
    line,
    message,
  };

  let mut out = Vec::new();
  for result in reader.records() {
    let record = result.map_err(|e| {
      let line = e.position().map(|p| p.line()).unwrap_or(0);
      format_error(line, e.to_string())
    })?;
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    if record.len() != columns {
      return Err(format_error(
        line,
        format!("expected {columns} fields, found {}", record.len()),
      ));
    }

    let value = record
      .deserialize::<T>(None)
      .map_err(|e| format_error(line, deserialize_message(&e)))?;
    out.push((line, value));
  }

  Ok(out)
}

/// csv prefixes its own position information; keep only the field-level
/// description since the line is reported separately.
fn deserialize_message(err: &csv::Error) -> String {
  match err.kind() {
    csv::ErrorKind::Deserialize { err, .. } => match err.field() {
      Some(field) => format!("field {}: {}", field + 1, err.kind()),
      None => err.kind().to_string(),
    },
    _ => err.to_string(),
  }
}
