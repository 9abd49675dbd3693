// src/integrations/tmdb/client.rs
//
// Media-information provider client (TMDB-shaped REST API)
//
// ARCHITECTURE:
// - Plain GET endpoints: /{movie|tv}/{id} for details, /discover/movie for
//   ranked candidate pages
// - Maps external data → internal DTOs (NO domain mutation)
// - Used by EnrichmentService and DiscoveryService
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never creates or modifies domain entities directly
// - Returns DTOs that services can map
// - Handles all external API concerns

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{CandidatePage, MediaType};
use crate::error::FetchError;

/// Detail fields for one catalog item, as far as the provider knows them.
///
/// Every field is optional on the wire; `None` means the provider did not
/// send it, which is distinct from it sending an explicit zero or empty list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaDetails {
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub genres: Option<Vec<String>>,
    pub release_date: Option<String>,
    pub popularity: Option<f64>,
    /// Minutes
    pub runtime: Option<u32>,
}

/// The outbound seam to the media-information provider.
///
/// Services depend on this trait, never on `TmdbClient` directly, so tests
/// can substitute a mock and the provider can be swapped without touching
/// the pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// `GET /{movie|tv}/{item_id}`
    async fn fetch_details(
        &self,
        media_type: MediaType,
        item_id: i64,
    ) -> Result<MediaDetails, FetchError>;

    /// `GET /discover/movie?with_genres=...` — results come back already
    /// ranked by the provider's relevance ordering
    async fn discover_by_genres(&self, genres: &str, page: u32)
        -> Result<CandidatePage, FetchError>;

    /// `GET /discover/movie?with_keywords=...`
    async fn discover_by_keywords(
        &self,
        keywords: &str,
        page: u32,
    ) -> Result<CandidatePage, FetchError>;
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Deserialize)]
struct DetailsData {
    // movies carry `title`/`release_date`/`runtime`,
    // series carry `name`/`first_air_date`/`episode_run_time`
    title: Option<String>,
    name: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
    vote_average: Option<f64>,
    genres: Option<Vec<GenreData>>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    popularity: Option<f64>,
    runtime: Option<u32>,
    episode_run_time: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize)]
struct GenreData {
    name: String,
}

/// TMDB API client
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl TmdbClient {
    /// Create a new client against the public API
    pub fn new(api_key: String) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key,
            http_client,
        }
    }

    /// Create a client from TMDB_API_KEY (and optional TMDB_BASE_URL).
    /// Returns None when no key is configured.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("TMDB_API_KEY").ok()?;
        let mut client = Self::new(api_key);
        if let Ok(base_url) = std::env::var("TMDB_BASE_URL") {
            client.base_url = base_url;
        }
        Some(client)
    }

    /// Override the base URL (local stub servers in tests)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    // ========================================================================
    // INTERNAL: REQUEST EXECUTION
    // ========================================================================

    async fn execute_get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Validation(e.to_string()))
    }

    /// Map the wire shape to the provider-agnostic DTO
    fn map_details(data: DetailsData) -> MediaDetails {
        MediaDetails {
            title: data.title.or(data.name),
            poster_path: data.poster_path,
            overview: data.overview,
            vote_average: data.vote_average,
            genres: data
                .genres
                .map(|genres| genres.into_iter().map(|g| g.name).collect()),
            release_date: data.release_date.or(data.first_air_date),
            popularity: data.popularity,
            runtime: data
                .runtime
                .or_else(|| data.episode_run_time.and_then(|runs| runs.first().copied())),
        }
    }
}

#[async_trait]
impl MediaProvider for TmdbClient {
    async fn fetch_details(
        &self,
        media_type: MediaType,
        item_id: i64,
    ) -> Result<MediaDetails, FetchError> {
        let segment = media_type.provider_segment().ok_or_else(|| {
            FetchError::Validation(format!("no provider lookup for media type '{}'", media_type))
        })?;

        let path = format!("{}/{}", segment, item_id);
        let data: DetailsData = self.execute_get(&path, &[]).await?;
        Ok(Self::map_details(data))
    }

    async fn discover_by_genres(
        &self,
        genres: &str,
        page: u32,
    ) -> Result<CandidatePage, FetchError> {
        self.execute_get(
            "discover/movie",
            &[
                ("with_genres", genres.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    async fn discover_by_keywords(
        &self,
        keywords: &str,
        page: u32,
    ) -> Result<CandidatePage, FetchError> {
        self.execute_get(
            "discover/movie",
            &[
                ("with_keywords", keywords.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }
}
