use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{AnimeDetail, AnimeSummary, CatalogProvider};
use crate::error::{Error, Result};

pub const JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";

pub struct JikanClient {
    client: Client,
    base_url: String,
}

impl JikanClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("hakken/0.1")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }
}

impl Default for JikanClient {
    fn default() -> Self {
        Self::new(JIKAN_BASE_URL)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for JikanClient {
    async fn search_page(&self, query: &str, page: u32) -> Result<Vec<AnimeSummary>> {
        let url = format!(
            "{}/anime?q={}&page={}",
            self.base_url,
            urlencoding::encode(query),
            page
        );

        debug!(url = %url, "Fetching search page");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Api(format!("HTTP error: {}", response.status())));
        }

        let body = response.text().await?;
        decode_search(&body)
    }

    async fn fetch_by_id(&self, id: u64) -> Result<AnimeDetail> {
        let url = format!("{}/anime/{}", self.base_url, id);

        debug!(url = %url, "Fetching detail");

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id));
        }

        if !response.status().is_success() {
            return Err(Error::Api(format!("HTTP error: {}", response.status())));
        }

        let body = response.text().await?;
        decode_detail(&body)
    }
}

// Wire shapes for the Jikan v4 envelopes. Only the fields the app uses are
// declared; everything optional so a sparse record still decodes.

#[derive(Deserialize)]
struct SearchEnvelope {
    // Absent `data` means no more results, same as an empty array
    #[serde(default)]
    data: Vec<RawAnime>,
}

#[derive(Deserialize)]
struct DetailEnvelope {
    data: RawAnime,
}

#[derive(Deserialize, Default)]
struct RawAnime {
    mal_id: u64,
    title: String,
    #[serde(rename = "type")]
    media_type: Option<String>,
    duration: Option<String>,
    episodes: Option<u32>,
    score: Option<f64>,
    synopsis: Option<String>,
    images: Option<RawImages>,
    season: Option<String>,
    year: Option<u32>,
    rating: Option<String>,
    rank: Option<u32>,
    popularity: Option<u32>,
    favorites: Option<u32>,
    background: Option<String>,
    trailer: Option<RawTrailer>,
    title_english: Option<String>,
    title_japanese: Option<String>,
    #[serde(default)]
    title_synonyms: Vec<String>,
    #[serde(default)]
    genres: Vec<RawTag>,
    #[serde(default)]
    themes: Vec<RawTag>,
    #[serde(default)]
    studios: Vec<RawTag>,
    #[serde(default)]
    producers: Vec<RawTag>,
    #[serde(default)]
    licensors: Vec<RawTag>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawImages {
    jpg: Option<RawImageSet>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawImageSet {
    image_url: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawTrailer {
    url: Option<String>,
}

#[derive(Deserialize)]
struct RawTag {
    name: String,
}

fn tag_names(tags: Vec<RawTag>) -> Vec<String> {
    tags.into_iter().map(|t| t.name).collect()
}

impl RawAnime {
    fn image_url(&self) -> Option<String> {
        self.images
            .as_ref()
            .and_then(|i| i.jpg.as_ref())
            .and_then(|j| j.image_url.clone())
    }

    fn into_summary(self) -> AnimeSummary {
        let image_url = self.image_url();
        AnimeSummary {
            mal_id: self.mal_id,
            title: self.title,
            media_type: self.media_type,
            duration: self.duration,
            episodes: self.episodes,
            score: self.score,
            synopsis: self.synopsis,
            image_url,
            season: self.season,
        }
    }

    fn into_detail(self) -> AnimeDetail {
        let image_url = self.image_url();
        AnimeDetail {
            mal_id: self.mal_id,
            title: self.title,
            title_english: self.title_english,
            title_japanese: self.title_japanese,
            title_synonyms: self.title_synonyms,
            media_type: self.media_type,
            duration: self.duration,
            episodes: self.episodes,
            score: self.score,
            synopsis: self.synopsis,
            image_url,
            season: self.season,
            year: self.year,
            rating: self.rating,
            rank: self.rank,
            popularity: self.popularity,
            favorites: self.favorites,
            background: self.background,
            trailer_url: self.trailer.and_then(|t| t.url),
            genres: tag_names(self.genres),
            themes: tag_names(self.themes),
            studios: tag_names(self.studios),
            producers: tag_names(self.producers),
            licensors: tag_names(self.licensors),
        }
    }
}

fn decode_search(body: &str) -> Result<Vec<AnimeSummary>> {
    let envelope: SearchEnvelope = serde_json::from_str(body)?;
    let results: Vec<AnimeSummary> = envelope
        .data
        .into_iter()
        .map(RawAnime::into_summary)
        .collect();

    debug!(count = results.len(), "Decoded search page");
    Ok(results)
}

fn decode_detail(body: &str) -> Result<AnimeDetail> {
    let envelope: DetailEnvelope = serde_json::from_str(body)?;
    Ok(envelope.data.into_detail())
}
