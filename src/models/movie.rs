use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A movie as returned by the catalog service.
///
/// List endpoints (trending, search, discover) carry flat `genre_ids`, while
/// the detail endpoint nests full genre objects instead. Both forms are kept
/// so a snapshot taken from either endpoint can feed the preference tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Catalog identifier, the unique key for history and watchlist entries
    pub id: u64,
    pub title: String,
    /// Relative poster path, joined against the poster image base URL
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Relative backdrop path, joined against the backdrop image base URL
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub release_date: Option<NaiveDate>,
    /// Flat genre ids from list endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<u64>>,
    /// Nested genre objects from the detail endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
}

impl Movie {
    /// Returns the movie's genre ids regardless of which form the catalog
    /// supplied them in. Empty when the snapshot carries neither.
    pub fn genre_ids(&self) -> Vec<u64> {
        if let Some(ids) = &self.genre_ids {
            ids.clone()
        } else if let Some(genres) = &self.genres {
            genres.iter().map(|g| g.id).collect()
        } else {
            Vec::new()
        }
    }
}

/// The catalog sends `"release_date": ""` for unreleased titles.
fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// An entry in the catalog's genre taxonomy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Paginated list envelope used by every catalog list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Full movie detail, including the expanded trailer and cast sub-resources
/// requested via `append_to_response=videos,credits`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct VideoList {
    pub results: Vec<Video>,
}

/// A trailer or clip hosted off-catalog (site + key, e.g. YouTube)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Credits {
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// A user review attached to a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_with(genre_ids: Option<Vec<u64>>, genres: Option<Vec<Genre>>) -> Movie {
        Movie {
            id: 1,
            title: "Heat".to_string(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 8.3,
            release_date: None,
            genre_ids,
            genres,
        }
    }

    #[test]
    fn test_genre_ids_from_flat_list() {
        let movie = movie_with(Some(vec![28, 80]), None);
        assert_eq!(movie.genre_ids(), vec![28, 80]);
    }

    #[test]
    fn test_genre_ids_from_nested_objects() {
        let genres = vec![
            Genre { id: 28, name: "Action".to_string() },
            Genre { id: 80, name: "Crime".to_string() },
        ];
        let movie = movie_with(None, Some(genres));
        assert_eq!(movie.genre_ids(), vec![28, 80]);
    }

    #[test]
    fn test_genre_ids_absent() {
        let movie = movie_with(None, None);
        assert!(movie.genre_ids().is_empty());
    }

    #[test]
    fn test_empty_release_date_deserializes_as_none() {
        let movie: Movie = serde_json::from_str(
            r#"{"id": 5, "title": "Unreleased", "release_date": ""}"#,
        )
        .unwrap();
        assert_eq!(movie.release_date, None);
    }

    #[test]
    fn test_release_date_parses() {
        let movie: Movie = serde_json::from_str(
            r#"{"id": 5, "title": "Heat", "release_date": "1995-12-15"}"#,
        )
        .unwrap();
        assert_eq!(
            movie.release_date,
            NaiveDate::from_ymd_opt(1995, 12, 15)
        );
    }
}
