/// Catalog data provider abstraction
///
/// The catalog (movie metadata) service is an external collaborator; every
/// call can fail with a transport error or a non-success status, and callers
/// must treat a failure as "no data" rather than crash.
use crate::{
    error::AppResult,
    models::{Genre, Movie, MovieDetails, Page, Review},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for catalog providers
///
/// Mirrors the consumed subset of the catalog API: trending, search, detail
/// with expanded sub-resources, genre taxonomy, discovery by genre, and
/// reviews. Pagination and ranking stay on the provider side; this crate
/// only aggregates responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Trending movies for the given page
    async fn trending(&self, page: u32) -> AppResult<Page<Movie>>;

    /// Keyword search; rejects blank queries
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Full detail for one movie, with trailer and cast sub-resources
    async fn movie_details(&self, id: u64) -> AppResult<MovieDetails>;

    /// The genre taxonomy (id → name)
    async fn genres(&self) -> AppResult<Vec<Genre>>;

    /// Discovery by genre, sorted popularity-descending by the provider
    async fn discover(&self, genre_ids: &[u64], page: u32) -> AppResult<Page<Movie>>;

    /// Reviews for one movie
    async fn reviews(&self, id: u64) -> AppResult<Vec<Review>>;
}

/// Shown when a movie carries no poster or backdrop path
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://placehold.co/500x750?text=No+Poster";

/// Resolves the catalog's relative image paths against the two fixed base
/// prefixes (poster/cast-sized and full backdrop), falling back to a
/// generic placeholder when a path is absent.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    pub poster_base: String,
    pub backdrop_base: String,
}

impl ImageUrls {
    pub fn new(poster_base: String, backdrop_base: String) -> Self {
        Self {
            poster_base,
            backdrop_base,
        }
    }

    pub fn poster_url(&self, path: Option<&str>) -> String {
        match path {
            Some(p) => format!("{}{}", self.poster_base, p),
            None => PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }

    pub fn backdrop_url(&self, path: Option<&str>) -> String {
        match path {
            Some(p) => format!("{}{}", self.backdrop_base, p),
            None => PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> ImageUrls {
        ImageUrls::new(
            "https://image.tmdb.org/t/p/w500".to_string(),
            "https://image.tmdb.org/t/p/original".to_string(),
        )
    }

    #[test]
    fn test_poster_url_joins_base_and_path() {
        assert_eq!(
            urls().poster_url(Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_backdrop_url_uses_full_size_base() {
        assert_eq!(
            urls().backdrop_url(Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
    }

    #[test]
    fn test_absent_path_falls_back_to_placeholder() {
        assert_eq!(urls().poster_url(None), PLACEHOLDER_IMAGE_URL);
        assert_eq!(urls().backdrop_url(None), PLACEHOLDER_IMAGE_URL);
    }
}
