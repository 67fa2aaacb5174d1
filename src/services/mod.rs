pub mod identity;
pub mod providers;
pub mod ranker;
pub mod tracker;

pub use identity::Identity;
pub use providers::CatalogProvider;
pub use ranker::LatestRecommendations;
pub use tracker::PreferenceTracker;
