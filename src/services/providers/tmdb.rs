/// TMDB (The Movie Database) metadata provider
///
/// Endpoints used:
/// 1. Search: /search/multi → movies and shows (people are dropped)
/// 2. Details: /movie/{id} or /tv/{id} → summary, genres, runtime
/// 3. Certification: /movie/{id}/release_dates or /tv/{id}/content_ratings
///
/// Every successful response is stored in the Redis cache with a fixed TTL.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        MediaType, Title, TitleKey, TitleMetadata, TmdbContentRatings, TmdbReleaseDates,
        TmdbSearchResponse, TmdbTitleDetails,
    },
    services::providers::MetadataProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const CERTIFICATION_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    /// ISO 3166-1 code used to pick certifications
    region: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, region: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            region,
            cache,
        }
    }

    /// GETs a TMDB path and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {}", path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(path = %path, status = %status, body = %body, "TMDB request failed");
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn fetch_search(&self, query: &str) -> AppResult<Vec<Title>> {
        let response: TmdbSearchResponse = self
            .get_json(
                "/search/multi",
                &[("query", query), ("include_adult", "false")],
            )
            .await?;

        let titles: Vec<Title> = response
            .results
            .into_iter()
            .filter_map(|result| result.into_title())
            .collect();

        tracing::info!(
            query = %query,
            results = titles.len(),
            provider = self.name(),
            "Title search completed"
        );

        Ok(titles)
    }

    async fn fetch_details(&self, key: &TitleKey) -> AppResult<TitleMetadata> {
        let details: TmdbTitleDetails = self.get_json(&details_path(key), &[]).await?;
        let metadata = details.into_metadata(key.media_type);

        tracing::info!(
            title = %key,
            genres = metadata.genres.len(),
            provider = self.name(),
            "Title details fetched"
        );

        Ok(metadata)
    }

    async fn fetch_region_certification(&self, key: &TitleKey) -> AppResult<Option<String>> {
        let certification = match key.media_type {
            MediaType::Movie => {
                let dates: TmdbReleaseDates =
                    self.get_json(&certification_path(key), &[]).await?;
                dates.certification_for(&self.region)
            }
            MediaType::Tv => {
                let ratings: TmdbContentRatings =
                    self.get_json(&certification_path(key), &[]).await?;
                ratings.certification_for(&self.region)
            }
        };

        tracing::debug!(
            title = %key,
            region = %self.region,
            certification = ?certification,
            "Certification fetched"
        );

        Ok(certification)
    }
}

fn details_path(key: &TitleKey) -> String {
    format!("/{}/{}", key.media_type, key.tmdb_id)
}

fn certification_path(key: &TitleKey) -> String {
    match key.media_type {
        MediaType::Movie => format!("/movie/{}/release_dates", key.tmdb_id),
        MediaType::Tv => format!("/tv/{}/content_ratings", key.tmdb_id),
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_titles(&self, query: &str) -> AppResult<Vec<Title>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::TitleSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            self.fetch_search(query)
        )
    }

    async fn fetch_metadata(&self, key: &TitleKey) -> AppResult<TitleMetadata> {
        cached!(
            self.cache,
            CacheKey::TitleDetails(*key),
            DETAILS_CACHE_TTL,
            self.fetch_details(key)
        )
    }

    async fn fetch_certification(&self, key: &TitleKey) -> AppResult<Option<String>> {
        cached!(
            self.cache,
            CacheKey::Certification(*key, self.region.clone()),
            CERTIFICATION_CACHE_TTL,
            self.fetch_region_certification(key)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_path_movie() {
        let key = TitleKey::new(MediaType::Movie, 27205);
        assert_eq!(details_path(&key), "/movie/27205");
    }

    #[test]
    fn test_details_path_tv() {
        let key = TitleKey::new(MediaType::Tv, 1396);
        assert_eq!(details_path(&key), "/tv/1396");
    }

    #[test]
    fn test_certification_path_uses_release_dates_for_movies() {
        let key = TitleKey::new(MediaType::Movie, 27205);
        assert_eq!(certification_path(&key), "/movie/27205/release_dates");
    }

    #[test]
    fn test_certification_path_uses_content_ratings_for_tv() {
        let key = TitleKey::new(MediaType::Tv, 1396);
        assert_eq!(certification_path(&key), "/tv/1396/content_ratings");
    }

    #[tokio::test]
    async fn test_new_trims_trailing_slash() {
        let client = redis::Client::open("redis://localhost:6379").unwrap();
        let (cache, _handle) = Cache::new(client);
        let provider = TmdbProvider::new(
            cache,
            "key".to_string(),
            "https://api.themoviedb.org/3/".to_string(),
            "US".to_string(),
        );

        assert_eq!(provider.api_url, "https://api.themoviedb.org/3");
        assert_eq!(provider.name(), "tmdb");
    }
}
