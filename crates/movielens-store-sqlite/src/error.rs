//! Error type for `movielens-store-sqlite`.

use movielens_core::{Classify, FailureKind, movie::MovieId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Source files could not be read or parsed.
  #[error(transparent)]
  Core(#[from] movielens_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// Creating the tables failed.
  #[error("schema error: {0}")]
  Schema(#[source] rusqlite::Error),

  /// The connection refused to turn on foreign-key enforcement.
  #[error("foreign key enforcement is not available")]
  ForeignKeysDisabled,

  /// A loaded catalog listed the same movie twice.
  #[error("duplicate movie_id {0} in catalog source")]
  DuplicateMovie(MovieId),

  /// A rating or genre tag named a movie that does not exist.
  #[error("movie {0} does not exist")]
  ReferentialIntegrity(MovieId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Classify for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Error::Core(e) => e.kind(),
      Error::Schema(_) | Error::ForeignKeysDisabled => FailureKind::Schema,
      Error::DuplicateMovie(_) => FailureKind::SourceFormat,
      Error::ReferentialIntegrity(_) => FailureKind::ReferentialIntegrity,
      Error::Database(_) | Error::Sqlite(_) => FailureKind::Backend,
    }
  }
}
