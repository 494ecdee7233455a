//! The wire shape of an OMDb lookup and its mapping onto
//! [`ExternalMetadata`].

use movielens_core::metadata::ExternalMetadata;
use serde::Deserialize;

/// Raw fields from `GET /?i=<imdb id>`. Only the fields the catalog shows
/// are kept; OMDb sends many more.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
  /// `"True"` or `"False"`, as a string.
  pub response:    String,
  pub error:       Option<String>,
  pub title:       Option<String>,
  pub year:        Option<String>,
  pub rated:       Option<String>,
  pub runtime:     Option<String>,
  pub director:    Option<String>,
  pub actors:      Option<String>,
  pub plot:        Option<String>,
  pub poster:      Option<String>,
  #[serde(rename = "imdbRating")]
  pub imdb_rating: Option<String>,
}

impl OmdbResponse {
  /// `None` when OMDb reported no match.
  pub fn into_metadata(self) -> Option<ExternalMetadata> {
    if !self.response.eq_ignore_ascii_case("true") {
      return None;
    }

    Some(ExternalMetadata {
      title:           present(self.title),
      year:            present(self.year),
      rated:           present(self.rated),
      runtime:         present(self.runtime),
      director:        present(self.director),
      actors:          present(self.actors),
      plot:            present(self.plot),
      poster_url:      present(self.poster),
      external_rating: present(self.imdb_rating),
    })
  }
}

/// OMDb fills unknown fields with `"N/A"`.
fn present(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty() && v != "N/A")
}
