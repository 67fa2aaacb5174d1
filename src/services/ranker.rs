use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::Movie;
use crate::services::providers::CatalogProvider;

/// Number of top genres used to seed a recommendation query
pub const TOP_GENRE_COUNT: usize = 3;

/// Ranks genre ids by how often they occur across the given history.
///
/// Each movie contributes one count per distinct genre it carries. Ties are
/// broken by first appearance during front-to-back (most-recent-first)
/// traversal, so equal-count genres from recent views rank ahead of older
/// ones and the result is deterministic.
pub fn top_genres(history: &[Movie], k: usize) -> Vec<u64> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    let mut order: Vec<u64> = Vec::new();

    for movie in history {
        for genre_id in movie.genre_ids() {
            let count = counts.entry(genre_id).or_insert(0);
            if *count == 0 {
                order.push(genre_id);
            }
            *count += 1;
        }
    }

    // Stable sort keeps the first-encountered order within equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(k);
    order
}

/// Fetches recommendations for the given history: derives the top genres
/// and asks the catalog for popularity-ranked movies tagged with them.
///
/// The result list is returned as-is; it is not deduplicated against the
/// history or watchlist. An empty history yields an empty list without a
/// catalog call.
pub async fn recommend(
    provider: &dyn CatalogProvider,
    history: &[Movie],
) -> AppResult<Vec<Movie>> {
    let genres = top_genres(history, TOP_GENRE_COUNT);
    if genres.is_empty() {
        return Ok(Vec::new());
    }

    let page = provider.discover(&genres, 1).await?;

    tracing::info!(
        genres = ?genres,
        results = page.results.len(),
        "Recommendations fetched"
    );

    Ok(page.results)
}

/// Shared slot holding the most recently published recommendation list,
/// guarded against slow superseded fetches.
///
/// Each fetch takes a sequence number before calling the catalog; on
/// resolution the result is published only if no newer fetch has started
/// since. A slow earlier response therefore never overwrites a newer one,
/// it is simply dropped on arrival.
#[derive(Default)]
pub struct LatestRecommendations {
    seq: AtomicU64,
    slot: RwLock<Option<(u64, Vec<Movie>)>>,
}

impl LatestRecommendations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fetch, returning its sequence number
    pub fn begin(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes a completed fetch. Returns false (and leaves the slot
    /// untouched) when the fetch has been superseded.
    pub async fn publish(&self, seq: u64, movies: Vec<Movie>) -> bool {
        if seq != self.seq.load(Ordering::SeqCst) {
            tracing::debug!(seq = seq, "Dropping superseded recommendation fetch");
            return false;
        }

        let mut slot = self.slot.write().await;
        match slot.as_ref() {
            Some((published, _)) if *published > seq => false,
            _ => {
                *slot = Some((seq, movies));
                true
            }
        }
    }

    /// The most recently published list, if any
    pub async fn latest(&self) -> Option<Vec<Movie>> {
        self.slot.read().await.as_ref().map(|(_, m)| m.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;
    use crate::services::providers::MockCatalogProvider;

    fn movie(id: u64, genre_ids: Vec<u64>) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            poster_path: None,
            backdrop_path: None,
            vote_average: 7.0,
            release_date: None,
            genre_ids: Some(genre_ids),
            genres: None,
        }
    }

    #[test]
    fn test_top_genres_empty_history() {
        assert!(top_genres(&[], 3).is_empty());
    }

    #[test]
    fn test_top_genres_counts_and_tie_break() {
        let history = vec![
            movie(1, vec![1, 2]),
            movie(2, vec![2, 3]),
            movie(3, vec![2]),
        ];

        // Genre 2 wins on count; 1 and 3 tie and keep front-to-back
        // first-appearance order.
        assert_eq!(top_genres(&history, 3), vec![2, 1, 3]);
    }

    #[test]
    fn test_top_genres_truncates_to_k() {
        let history = vec![movie(1, vec![1, 2, 3, 4, 5])];
        assert_eq!(top_genres(&history, 3).len(), 3);
    }

    #[test]
    fn test_top_genres_reads_nested_genre_objects() {
        use crate::models::Genre;
        let mut m = movie(1, vec![]);
        m.genre_ids = None;
        m.genres = Some(vec![Genre { id: 18, name: "Drama".to_string() }]);

        assert_eq!(top_genres(&[m], 3), vec![18]);
    }

    #[tokio::test]
    async fn test_recommend_empty_history_skips_catalog() {
        let provider = MockCatalogProvider::new();
        // No expectation set: any catalog call would panic.
        let recs = recommend(&provider, &[]).await.unwrap();
        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_queries_top_genres() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_discover()
            .withf(|genres, page| genres.iter().copied().eq([2u64, 1, 3]) && *page == 1)
            .returning(|_, _| {
                Ok(Page {
                    page: 1,
                    results: vec![],
                    total_pages: 1,
                    total_results: 0,
                })
            });

        let history = vec![
            movie(1, vec![1, 2]),
            movie(2, vec![2, 3]),
            movie(3, vec![2]),
        ];
        recommend(&provider, &history).await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_fetch_does_not_overwrite_newer() {
        let latest = LatestRecommendations::new();

        let old_seq = latest.begin();
        let new_seq = latest.begin();

        assert!(latest.publish(new_seq, vec![movie(1, vec![])]).await);
        assert!(!latest.publish(old_seq, vec![movie(2, vec![])]).await);

        let published = latest.latest().await.unwrap();
        assert_eq!(published[0].id, 1);
    }

    #[tokio::test]
    async fn test_publish_current_sequence() {
        let latest = LatestRecommendations::new();
        let seq = latest.begin();
        assert!(latest.publish(seq, vec![movie(9, vec![])]).await);
        assert_eq!(latest.latest().await.unwrap()[0].id, 9);
    }
}
