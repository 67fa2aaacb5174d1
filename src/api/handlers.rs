use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Genre, Movie, MovieDetails, Page, Review, User};
use crate::services::ranker;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    pub genre: u64,
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Movie detail enriched with resolved image URLs, so clients never see a
/// bare relative path.
#[derive(Debug, Serialize)]
pub struct MovieDetailsResponse {
    #[serde(flatten)]
    pub details: MovieDetails,
    pub poster_url: String,
    pub backdrop_url: String,
}

/// Mutation response for tracker endpoints. `warning` is set when the
/// mutation took effect in memory but could not be persisted; the client
/// may surface it without rolling anything back.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<Movie>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub watchlist: Vec<Movie>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: u64,
    pub in_watchlist: bool,
}

// Catalog handlers

/// Trending movies for a page
pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<Page<Movie>>> {
    let page = state.catalog.trending(params.page).await?;
    Ok(Json(page))
}

/// Keyword search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.catalog.search(&params.q).await?;
    Ok(Json(movies))
}

/// Discovery by genre, popularity-descending
pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverQuery>,
) -> AppResult<Json<Page<Movie>>> {
    let page = state.catalog.discover(&[params.genre], params.page).await?;
    Ok(Json(page))
}

/// Movie detail with trailer and cast sub-resources
pub async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<MovieDetailsResponse>> {
    let details = state.catalog.movie_details(id).await?;

    let poster_url = state.images.poster_url(details.movie.poster_path.as_deref());
    let backdrop_url = state
        .images
        .backdrop_url(details.movie.backdrop_path.as_deref());

    Ok(Json(MovieDetailsResponse {
        details,
        poster_url,
        backdrop_url,
    }))
}

/// Reviews for one movie
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Vec<Review>>> {
    let reviews = state.catalog.reviews(id).await?;
    Ok(Json(reviews))
}

/// Genre taxonomy
pub async fn genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.catalog.genres().await?;
    Ok(Json(genres))
}

// Preference tracker handlers

/// Current history, most recent first
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.tracker.history().await)
}

/// Records a view. A persistence failure does not roll back the in-memory
/// update; it is reported in the `warning` field instead.
pub async fn record_view(
    State(state): State<AppState>,
    Json(movie): Json<Movie>,
) -> Json<HistoryResponse> {
    let warning = state.tracker.record_view(movie).await.err().map(|e| e.to_string());
    Json(HistoryResponse {
        history: state.tracker.history().await,
        warning,
    })
}

/// Current watchlist in insertion order
pub async fn get_watchlist(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.tracker.watchlist().await)
}

/// Adds to the watchlist; requires a signed-in user
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Json(movie): Json<Movie>,
) -> AppResult<Json<WatchlistResponse>> {
    require_user(&state)?;

    let warning = state
        .tracker
        .add_to_watchlist(movie)
        .await
        .err()
        .map(|e| e.to_string());

    Ok(Json(WatchlistResponse {
        watchlist: state.tracker.watchlist().await,
        warning,
    }))
}

/// Removes from the watchlist; requires a signed-in user
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<Json<WatchlistResponse>> {
    require_user(&state)?;

    let warning = state
        .tracker
        .remove_from_watchlist(id)
        .await
        .err()
        .map(|e| e.to_string());

    Ok(Json(WatchlistResponse {
        watchlist: state.tracker.watchlist().await,
        warning,
    }))
}

/// Watchlist membership query
pub async fn watchlist_contains(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Json<MembershipResponse> {
    Json(MembershipResponse {
        id,
        in_watchlist: state.tracker.is_in_watchlist(id).await,
    })
}

// Recommendation ranker handler

/// Genre-frequency recommendations from the current history.
///
/// Guarded by a sequence number so a slow response that has been superseded
/// by a newer request is dropped from the shared latest-list instead of
/// overwriting it. The caller still gets its own result either way.
pub async fn recommendations(State(state): State<AppState>) -> AppResult<Json<Vec<Movie>>> {
    let seq = state.recommendations.begin();
    let history = state.tracker.history().await;

    let movies = ranker::recommend(state.catalog.as_ref(), &history).await?;

    state.recommendations.publish(seq, movies.clone()).await;
    Ok(Json(movies))
}

// Identity handlers

/// Creates an account and signs the user in
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state
        .identity
        .sign_up(&request.email, &request.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Signs an existing user in
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<Json<User>> {
    let user = state
        .identity
        .sign_in(&request.email, &request.password)
        .await?;
    Ok(Json(user))
}

/// Signs the current user out
pub async fn logout(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.identity.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The current user, if any
pub async fn me(State(state): State<AppState>) -> Json<Option<User>> {
    Json(state.identity.current_user())
}

/// Watchlist mutations are gated on a signed-in user; the tracker itself
/// never checks identity.
fn require_user(state: &AppState) -> AppResult<User> {
    state.identity.current_user().ok_or_else(|| {
        AppError::Unauthenticated("Sign in to manage your watchlist".to_string())
    })
}
