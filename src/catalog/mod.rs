use crate::error::Result;

pub mod jikan;

pub use jikan::JikanClient;

/// One search result as shown in the browse list. Immutable once decoded.
#[derive(Debug, Clone, Default)]
pub struct AnimeSummary {
    pub mal_id: u64,
    pub title: String,
    pub media_type: Option<String>,
    pub duration: Option<String>,
    pub episodes: Option<u32>,
    pub score: Option<f64>,
    pub synopsis: Option<String>,
    pub image_url: Option<String>,
    pub season: Option<String>,
}

/// Full record backing the detail view. Replaced wholesale on each fetch,
/// never merged with a previous record.
#[derive(Debug, Clone, Default)]
pub struct AnimeDetail {
    pub mal_id: u64,
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub title_synonyms: Vec<String>,
    pub media_type: Option<String>,
    pub duration: Option<String>,
    pub episodes: Option<u32>,
    pub score: Option<f64>,
    pub synopsis: Option<String>,
    pub image_url: Option<String>,
    pub season: Option<String>,
    pub year: Option<u32>,
    pub rating: Option<String>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub favorites: Option<u32>,
    pub background: Option<String>,
    pub trailer_url: Option<String>,
    pub genres: Vec<String>,
    pub themes: Vec<String>,
    pub studios: Vec<String>,
    pub producers: Vec<String>,
    pub licensors: Vec<String>,
}

#[async_trait::async_trait]
pub trait CatalogProvider {
    /// Fetch one page of search results. An empty query is a legal request
    /// and returns the remote service's default ordering. Never retries.
    async fn search_page(&self, query: &str, page: u32) -> Result<Vec<AnimeSummary>>;

    /// Fetch the full record for one title.
    async fn fetch_by_id(&self, id: u64) -> Result<AnimeDetail>;
}
