//! Error types for `movielens-core`.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading catalog source files.
#[derive(Debug, Error)]
pub enum Error {
  /// A record does not match the shape of the table it feeds.
  #[error("{file}:{line}: {message}")]
  SourceFormat {
    file:    String,
    line:    u64,
    message: String,
  },

  #[error("failed to read {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Taxonomy ────────────────────────────────────────────────────────────────

/// Coarse category of a catalog failure, independent of the backend that
/// produced it. Higher layers branch on this instead of on concrete types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// Table definition or constraint setup failed. The store is unusable.
  Schema,
  /// Malformed bulk-load input.
  SourceFormat,
  /// A write referenced a movie that does not exist.
  ReferentialIntegrity,
  /// A source file could not be read.
  Io,
  /// Anything else the backend reports.
  Backend,
}

/// Errors that can report their [`FailureKind`].
pub trait Classify {
  fn kind(&self) -> FailureKind;
}

impl Classify for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Error::SourceFormat { .. } => FailureKind::SourceFormat,
      Error::Io { .. } => FailureKind::Io,
    }
  }
}

