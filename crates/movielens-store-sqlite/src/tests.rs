//! Integration tests for `SqliteStore` against an in-memory database.

use std::{fs, path::Path};

use movielens_core::{
  Classify, FailureKind,
  movie::{CatalogCounts, MovieSummary, RatingSummary},
  source::{CatalogSource, GenreTagRecord, MovieRecord, RatingRecord, SourceSet},
  store::CatalogStore,
};

use crate::{Error, SqliteStore};

const MOVIES_TSV: &str = "\
movie_id\ttitle\tyear\timdb_id
1\tToy Story\t1995\t114709
2\tJumanji\t1995\t113497
3\tToy Story 2\t1999\t120363
4\tHeat\t1995\t113277
";

const GENRES_TSV: &str = "\
movie_id\tgenre
1\tAnimation
1\tComedy
2\tAdventure
3\tAnimation
3\tComedy
4\tAction
4\tCrime
";

const RATINGS_TSV: &str = "\
movie_id\trating
1\t3
1\t5
2\t4
";

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn fixture() -> CatalogSource {
  CatalogSource::from_readers(
    MOVIES_TSV.as_bytes(),
    GENRES_TSV.as_bytes(),
    RATINGS_TSV.as_bytes(),
  )
  .expect("fixture parses")
}

async fn loaded() -> SqliteStore {
  let s = store().await;
  s.load(fixture()).await.unwrap();
  s
}

fn movie(movie_id: i64, title: &str, year: i64) -> MovieRecord {
  MovieRecord { movie_id, title: title.into(), year, external_id: movie_id * 10 }
}

fn tag(movie_id: i64, genre: &str) -> GenreTagRecord {
  GenreTagRecord { movie_id, genre: genre.into() }
}

fn write_sources(dir: &Path, movies: &str, genres: &str, ratings: &str) -> SourceSet {
  fs::write(dir.join("movies.tsv"), movies).unwrap();
  fs::write(dir.join("genres.tsv"), genres).unwrap();
  fs::write(dir.join("ratings.tsv"), ratings).unwrap();
  SourceSet::in_dir(dir)
}

fn titles(rows: &[MovieSummary]) -> Vec<&str> {
  rows.iter().map(|m| m.title.as_str()).collect()
}

// ─── Opening ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_store_is_empty_but_queryable() {
  let s = store().await;
  assert_eq!(s.catalog_counts().await.unwrap(), CatalogCounts::default());
  assert!(s.search_by_title("").await.unwrap().is_empty());
  assert!(s.list_distinct_genres().await.unwrap().is_empty());
}

#[tokio::test]
async fn open_on_disk_and_close() {
  let dir = tempfile::tempdir().unwrap();
  let s = SqliteStore::open(dir.path().join("movielens.db")).await.unwrap();
  s.load(fixture()).await.unwrap();
  s.close().await.unwrap();

  let reopened = SqliteStore::open(dir.path().join("movielens.db")).await.unwrap();
  assert_eq!(reopened.catalog_counts().await.unwrap().movies, 4);
}

// ─── Loading ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_reports_row_counts() {
  let s = store().await;
  let counts = s.load(fixture()).await.unwrap();
  assert_eq!(counts, CatalogCounts { movies: 4, genre_tags: 7, ratings: 3 });
  assert_eq!(s.catalog_counts().await.unwrap(), counts);
}

#[tokio::test]
async fn initialize_reads_source_directory() {
  let dir = tempfile::tempdir().unwrap();
  let sources = write_sources(dir.path(), MOVIES_TSV, GENRES_TSV, RATINGS_TSV);

  let s = store().await;
  let counts = s.initialize(&sources).await.unwrap();
  assert_eq!(counts.movies, 4);

  let all = s.search_by_title("").await.unwrap();
  assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn reinitialize_is_idempotent_and_discards_submitted_ratings() {
  let dir = tempfile::tempdir().unwrap();
  let sources = write_sources(dir.path(), MOVIES_TSV, GENRES_TSV, RATINGS_TSV);
  let s = store().await;

  let first = s.initialize(&sources).await.unwrap();
  s.submit_rating(4, 2).await.unwrap();
  assert_eq!(s.catalog_counts().await.unwrap().ratings, first.ratings + 1);

  let second = s.initialize(&sources).await.unwrap();
  assert_eq!(first, second);
  assert_eq!(s.get_rating_summary(4).await.unwrap(), RatingSummary::default());
}

#[tokio::test]
async fn genre_and_rating_ids_are_assigned_by_the_store() {
  let s = loaded().await;
  // Ratings already hold ids 1..=3 from the load.
  let rating = s.submit_rating(2, 1).await.unwrap();
  assert_eq!(rating.rating_id, 4);
}

#[tokio::test]
async fn malformed_source_keeps_previous_catalog() {
  let dir = tempfile::tempdir().unwrap();
  let bad_ratings = "movie_id\trating\n1\tfive\n";
  let sources = write_sources(dir.path(), MOVIES_TSV, GENRES_TSV, bad_ratings);

  let s = loaded().await;
  let err = s.initialize(&sources).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::SourceFormat);
  assert_eq!(
    s.catalog_counts().await.unwrap(),
    CatalogCounts { movies: 4, genre_tags: 7, ratings: 3 }
  );
}

#[tokio::test]
async fn missing_source_file_is_io_error() {
  let dir = tempfile::tempdir().unwrap();
  let s = store().await;
  let err = s.initialize(&SourceSet::in_dir(dir.path())).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::Io);
}

#[tokio::test]
async fn orphan_genre_tag_rolls_back_load() {
  let s = loaded().await;
  let source = CatalogSource {
    movies:     vec![movie(10, "Solo", 2000)],
    genre_tags: vec![tag(10, "Drama"), tag(99, "Horror")],
    ratings:    vec![],
  };

  let err = s.load(source).await.unwrap_err();
  assert!(matches!(err, Error::ReferentialIntegrity(99)));
  assert_eq!(s.catalog_counts().await.unwrap().movies, 4);
  assert!(s.get_movie_detail(10).await.unwrap().is_none());
}

#[tokio::test]
async fn orphan_rating_rolls_back_load() {
  let s = store().await;
  let source = CatalogSource {
    movies:     vec![movie(1, "Solo", 2000)],
    genre_tags: vec![],
    ratings:    vec![RatingRecord { movie_id: 2, rating: 3 }],
  };

  let err = s.load(source).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::ReferentialIntegrity);
  assert_eq!(s.catalog_counts().await.unwrap(), CatalogCounts::default());
}

#[tokio::test]
async fn repeated_movie_id_in_loaded_records_is_a_format_error() {
  let s = loaded().await;
  let source = CatalogSource {
    movies: vec![movie(1, "First", 2000), movie(1, "Second", 2001)],
    ..Default::default()
  };

  let err = s.load(source).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateMovie(1)));
  assert_eq!(err.kind(), FailureKind::SourceFormat);
  assert_eq!(s.catalog_counts().await.unwrap().movies, 4);
}

// ─── Title search ────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_title_matches_every_movie_once() {
  let s = loaded().await;
  let all = s.search_by_title("").await.unwrap();
  assert_eq!(titles(&all), ["Heat", "Jumanji", "Toy Story", "Toy Story 2"]);
}

#[tokio::test]
async fn title_search_is_case_insensitive_and_ordered() {
  let s = loaded().await;
  let rows = s.search_by_title("toy").await.unwrap();
  assert_eq!(rows, vec![
    MovieSummary { movie_id: 1, title: "Toy Story".into(), year: 1995 },
    MovieSummary { movie_id: 3, title: "Toy Story 2".into(), year: 1999 },
  ]);
}

#[tokio::test]
async fn title_search_without_match_is_empty() {
  let s = loaded().await;
  assert!(s.search_by_title("Casablanca").await.unwrap().is_empty());
}

#[tokio::test]
async fn title_ties_break_on_year_then_id() {
  let s = store().await;
  s.load(CatalogSource {
    movies: vec![
      movie(5, "Hamlet", 1996),
      movie(3, "Hamlet", 1948),
      movie(4, "Hamlet", 1996),
    ],
    ..Default::default()
  })
  .await
  .unwrap();

  let ids: Vec<_> = s
    .search_by_title("hamlet")
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.movie_id)
    .collect();
  assert_eq!(ids, [3, 4, 5]);
}

#[tokio::test]
async fn title_wildcards_match_literally() {
  let s = store().await;
  s.load(CatalogSource {
    movies: vec![movie(1, "100% Arabica", 1997), movie(2, "1000 Clowns", 1965)],
    ..Default::default()
  })
  .await
  .unwrap();

  let rows = s.search_by_title("100%").await.unwrap();
  assert_eq!(titles(&rows), ["100% Arabica"]);
  assert!(s.search_by_title("_").await.unwrap().is_empty());
}

// ─── Genre search ────────────────────────────────────────────────────────────

#[tokio::test]
async fn genre_search_matches_partial_labels() {
  let s = loaded().await;
  let rows = s.search_by_genre("anim").await.unwrap();
  assert_eq!(titles(&rows), ["Toy Story", "Toy Story 2"]);
}

#[tokio::test]
async fn genre_search_repeats_movies_with_several_matching_tags() {
  let s = store().await;
  s.load(CatalogSource {
    movies:     vec![movie(1, "Annie Hall", 1977), movie(2, "Heat", 1995)],
    genre_tags: vec![tag(1, "Comedy"), tag(1, "Romantic Comedy"), tag(2, "Crime")],
    ratings:    vec![],
  })
  .await
  .unwrap();

  let rows = s.search_by_genre("Comedy").await.unwrap();
  assert_eq!(titles(&rows), ["Annie Hall", "Annie Hall"]);
}

// ─── Per-movie reads ─────────────────────────────────────────────────────────

#[tokio::test]
async fn movie_detail_found_and_missing() {
  let s = loaded().await;

  let toy = s.get_movie_detail(1).await.unwrap().unwrap();
  assert_eq!(toy.title, "Toy Story");
  assert_eq!(toy.year, 1995);
  assert_eq!(toy.external_id, 114709);

  assert!(s.get_movie_detail(404).await.unwrap().is_none());
}

#[tokio::test]
async fn genres_belong_to_the_requested_movie() {
  let s = loaded().await;

  let mut genres = s.get_genres(4).await.unwrap();
  genres.sort();
  assert_eq!(genres, ["Action", "Crime"]);

  assert_eq!(s.get_genres(2).await.unwrap(), ["Adventure"]);
  assert!(s.get_genres(404).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_genre_rows_are_preserved() {
  let s = store().await;
  s.load(CatalogSource {
    movies:     vec![movie(1, "Alien", 1979)],
    genre_tags: vec![tag(1, "Horror"), tag(1, "Horror")],
    ratings:    vec![],
  })
  .await
  .unwrap();

  assert_eq!(s.get_genres(1).await.unwrap(), ["Horror", "Horror"]);
}

#[tokio::test]
async fn rating_summary_without_ratings_is_null() {
  let s = loaded().await;
  let summary = s.get_rating_summary(3).await.unwrap();
  assert_eq!(summary, RatingSummary { average: None, count: 0 });
}

#[tokio::test]
async fn rating_summary_averages() {
  let s = loaded().await;
  assert_eq!(
    s.get_rating_summary(1).await.unwrap(),
    RatingSummary { average: Some(4.0), count: 2 }
  );
}

// ─── Submitting ratings ──────────────────────────────────────────────────────

#[tokio::test]
async fn submitted_rating_updates_summary() {
  let s = loaded().await;

  let rating = s.submit_rating(1, 7).await.unwrap();
  assert_eq!(rating.movie_id, 1);
  assert_eq!(rating.rating, 7);

  assert_eq!(
    s.get_rating_summary(1).await.unwrap(),
    RatingSummary { average: Some(5.0), count: 3 }
  );
}

#[tokio::test]
async fn submitting_for_unknown_movie_fails_without_writing() {
  let s = loaded().await;
  let before = s.catalog_counts().await.unwrap().ratings;

  let err = s.submit_rating(404, 5).await.unwrap_err();
  assert!(matches!(err, Error::ReferentialIntegrity(404)));
  assert_eq!(err.kind(), FailureKind::ReferentialIntegrity);

  assert_eq!(s.catalog_counts().await.unwrap().ratings, before);
}

#[tokio::test]
async fn rating_values_are_not_range_checked() {
  let s = loaded().await;
  s.submit_rating(3, -10).await.unwrap();
  s.submit_rating(3, 1000).await.unwrap();
  assert_eq!(
    s.get_rating_summary(3).await.unwrap(),
    RatingSummary { average: Some(495.0), count: 2 }
  );
}

// ─── Distinct genres ─────────────────────────────────────────────────────────

#[tokio::test]
async fn distinct_genres_are_sorted_and_unique() {
  let s = store().await;
  s.load(CatalogSource {
    movies:     vec![movie(1, "A", 2000), movie(2, "B", 2001)],
    genre_tags: vec![tag(1, "Action"), tag(2, "Drama"), tag(2, "Action")],
    ratings:    vec![],
  })
  .await
  .unwrap();

  assert_eq!(s.list_distinct_genres().await.unwrap(), ["Action", "Drama"]);
}

#[tokio::test]
async fn distinct_genres_over_fixture() {
  let s = loaded().await;
  assert_eq!(
    s.list_distinct_genres().await.unwrap(),
    ["Action", "Adventure", "Animation", "Comedy", "Crime"]
  );
}
