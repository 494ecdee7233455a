//! Catalog entities and the read models assembled from them.
//!
//! Movies and genre tags are reference data loaded from source files. Ratings
//! are the only rows added at runtime.

use serde::{Deserialize, Serialize};

use crate::metadata::ExternalMetadata;

/// Stable identity of a movie, shared by every table as the join key.
pub type MovieId = i64;

// ─── Entities ────────────────────────────────────────────────────────────────

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
  pub movie_id:    MovieId,
  pub title:       String,
  pub year:        i64,
  /// Identifier into the external metadata service (IMDb number without the
  /// `tt` prefix).
  pub external_id: i64,
}

/// The projection returned by title and genre searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
  pub movie_id: MovieId,
  pub title:    String,
  pub year:     i64,
}

/// A single stored score. The scale is application-defined and unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
  pub rating_id: i64,
  pub movie_id:  MovieId,
  pub rating:    i64,
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// Average and count of the ratings recorded for one movie.
///
/// `average` is `None` whenever `count` is zero; an unrated movie is not the
/// same thing as a movie rated zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
  pub average: Option<f64>,
  pub count:   u64,
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogCounts {
  pub movies:     u64,
  pub genre_tags: u64,
  pub ratings:    u64,
}

// ─── Detail view ─────────────────────────────────────────────────────────────

/// Everything shown on a movie's detail page. Never stored, always derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
  pub movie:    Movie,
  pub genres:   Vec<String>,
  pub rating:   RatingSummary,
  /// Supplemental data from the external service, absent when the lookup
  /// found nothing or failed.
  pub metadata: Option<ExternalMetadata>,
}
