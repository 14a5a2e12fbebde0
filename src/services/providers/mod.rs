/// Movie metadata provider abstraction
///
/// The catalog, advisory and verdict features only need three lookups from a
/// metadata source: free-text search, title details with genres, and the age
/// certification for a region. TMDB is the only implementation today.
use crate::{
    error::AppResult,
    models::{Title, TitleKey, TitleMetadata},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search movies and TV shows by name
    ///
    /// An empty or whitespace-only query is `InvalidInput`.
    async fn search_titles(&self, query: &str) -> AppResult<Vec<Title>>;

    /// Fetch summary, genres and runtime for a title
    ///
    /// Unknown titles are `NotFound`.
    async fn fetch_metadata(&self, key: &TitleKey) -> AppResult<TitleMetadata>;

    /// Fetch the age certification (e.g. "PG-13", "TV-MA"), if one is published
    async fn fetch_certification(&self, key: &TitleKey) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
