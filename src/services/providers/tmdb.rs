/// TMDB catalog provider
///
/// Thin client over the TMDB v3 REST API using bearer-token auth. Consumed
/// endpoints:
///
/// - `/trending/movie/day` — trending by page
/// - `/search/movie` — keyword search
/// - `/movie/{id}` — detail, with `append_to_response=videos,credits`
/// - `/genre/movie/list` — genre taxonomy
/// - `/discover/movie` — discovery by genre, popularity-descending
/// - `/movie/{id}/reviews` — reviews
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Genre, Movie, MovieDetails, Page, Review},
    services::providers::CatalogProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_token: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_token: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_token,
            api_url,
        }
    }

    /// Issues a GET against the catalog and returns the raw response after
    /// mapping non-success statuses to errors.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> AppResult<reqwest::Response> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(format!(
                    "Catalog has no resource at {}",
                    path
                )));
            }
            return Err(AppError::ExternalApi(format!(
                "Catalog API returned status {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn trending(&self, page: u32) -> AppResult<Page<Movie>> {
        let response = self
            .get("/trending/movie/day", &[("page", page.to_string())])
            .await?;
        let trending: Page<Movie> = response.json().await?;

        tracing::info!(
            page = page,
            results = trending.results.len(),
            "Trending fetch completed"
        );

        Ok(trending)
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let response = self
            .get("/search/movie", &[("query", query.to_string())])
            .await?;
        let page: Page<Movie> = response.json().await?;

        tracing::info!(
            query = %query,
            results = page.results.len(),
            "Movie search completed"
        );

        Ok(page.results)
    }

    async fn movie_details(&self, id: u64) -> AppResult<MovieDetails> {
        let response = self
            .get(
                &format!("/movie/{}", id),
                &[("append_to_response", "videos,credits".to_string())],
            )
            .await?;
        let details: MovieDetails = response.json().await?;
        Ok(details)
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        #[derive(Deserialize)]
        struct GenreList {
            genres: Vec<Genre>,
        }

        let response = self.get("/genre/movie/list", &[]).await?;
        let list: GenreList = response.json().await?;
        Ok(list.genres)
    }

    async fn discover(&self, genre_ids: &[u64], page: u32) -> AppResult<Page<Movie>> {
        let with_genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .get(
                "/discover/movie",
                &[
                    ("with_genres", with_genres),
                    ("sort_by", "popularity.desc".to_string()),
                    ("page", page.to_string()),
                ],
            )
            .await?;
        let discovered: Page<Movie> = response.json().await?;

        tracing::info!(
            genres = %genre_ids.len(),
            page = page,
            results = discovered.results.len(),
            "Discovery fetch completed"
        );

        Ok(discovered)
    }

    async fn reviews(&self, id: u64) -> AppResult<Vec<Review>> {
        #[derive(Deserialize)]
        struct ReviewPage {
            results: Vec<Review>,
        }

        let response = self.get(&format!("/movie/{}/reviews", id), &[]).await?;
        let page: ReviewPage = response.json().await?;
        Ok(page.results)
    }
}
