//! Media-search API client (GIPHY-compatible search endpoints).

use nimbus_core::{BackdropConfig, NetworkError, ReqwestErrorExt};
use reqwest::Client;
use serde::Deserialize;

use crate::types::MediaFormat;

const USER_AGENT: &str = "Nimbus/0.1.0";

/// Why a search produced nothing usable.
///
/// The resolver treats every variant the same way (fall back to a static
/// image); the distinction only shows up in logs.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Search API returned status {0}")]
    Status(u16),
    #[error("Malformed search response: {0}")]
    Decode(String),
    #[error("Search returned no usable results")]
    NoResults,
}

impl SearchError {
    /// Classify the failure with the application's network error taxonomy.
    pub fn into_network_error(self) -> NetworkError {
        match self {
            SearchError::Network(e) => e.into_network_error(),
            SearchError::Status(status) => NetworkError::ServerError {
                status,
                message: "media search request rejected".to_string(),
            },
            SearchError::Decode(msg) => NetworkError::InvalidResponse(msg),
            SearchError::NoResults => {
                NetworkError::InvalidResponse("no usable search results".to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<SearchRecord>,
}

#[derive(Debug, Deserialize)]
struct SearchRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    images: Option<Renditions>,
}

#[derive(Debug, Deserialize)]
struct Renditions {
    #[serde(default)]
    original: Option<Rendition>,
}

#[derive(Debug, Deserialize)]
struct Rendition {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    mp4: Option<String>,
}

/// One search hit with the renditions the background can use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCandidate {
    pub id: Option<String>,
    /// Direct animated-image URL
    pub url: String,
    /// MP4 rendition, when the result carries one
    pub video_url: Option<String>,
}

impl MediaCandidate {
    /// URL for the requested format; video degrades to the standard URL.
    pub fn url_for(&self, format: MediaFormat) -> &str {
        match (format, self.video_url.as_deref()) {
            (MediaFormat::Video, Some(video)) => video,
            _ => &self.url,
        }
    }

    fn from_record(record: SearchRecord) -> Option<Self> {
        let original = record.images?.original?;
        let url = original.url.filter(|u| !u.trim().is_empty())?;
        let video_url = original.mp4.filter(|u| !u.trim().is_empty());
        Some(Self {
            id: record.id,
            url,
            video_url,
        })
    }
}

/// HTTP client for the media-search API.
///
/// No request timeout is set; requests rely on the platform's network defaults.
#[derive(Debug, Clone)]
pub struct MediaSearchClient {
    client: Client,
    base_url: String,
    limit: u32,
    rating: String,
    language: String,
}

impl MediaSearchClient {
    /// Create a client for the API rooted at `base_url` (e.g. `https://api.giphy.com/v1`).
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let defaults = BackdropConfig::default();
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limit: defaults.result_limit,
            rating: defaults.rating,
            language: defaults.language,
        })
    }

    pub fn from_config(config: &BackdropConfig) -> Result<Self, SearchError> {
        Ok(Self::new(&config.search_base_url)?
            .with_limit(config.result_limit)
            .with_rating(&config.rating)
            .with_language(&config.language))
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_rating(mut self, rating: &str) -> Self {
        self.rating = rating.to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a single search request. Never retries.
    ///
    /// Returns the usable candidates in API order; an empty list is reported
    /// as `SearchError::NoResults`.
    pub async fn search(
        &self,
        api_key: &str,
        term: &str,
        format: MediaFormat,
    ) -> Result<Vec<MediaCandidate>, SearchError> {
        let url = format!("{}/{}/search", self.base_url, format.endpoint());
        let limit = self.limit.to_string();

        tracing::debug!("Searching {} for {:?}", url, term);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("q", term),
                ("limit", limit.as_str()),
                ("rating", self.rating.as_str()),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        let candidates: Vec<MediaCandidate> = body
            .data
            .into_iter()
            .filter_map(MediaCandidate::from_record)
            .collect();

        if candidates.is_empty() {
            return Err(SearchError::NoResults);
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> SearchRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_candidate_from_full_record() {
        let candidate = MediaCandidate::from_record(record(serde_json::json!({
            "id": "abc",
            "title": "storm",
            "images": {
                "original": {
                    "url": "https://media.example.com/abc.gif",
                    "mp4": "https://media.example.com/abc.mp4",
                    "webp": "https://media.example.com/abc.webp"
                },
                "fixed_height": { "url": "https://media.example.com/abc-small.gif" }
            }
        })))
        .unwrap();

        assert_eq!(candidate.id.as_deref(), Some("abc"));
        assert_eq!(candidate.url_for(MediaFormat::Standard), "https://media.example.com/abc.gif");
        assert_eq!(candidate.url_for(MediaFormat::Video), "https://media.example.com/abc.mp4");
    }

    #[test]
    fn test_video_preference_degrades_without_mp4() {
        let candidate = MediaCandidate::from_record(record(serde_json::json!({
            "images": { "original": { "url": "https://media.example.com/x.gif" } }
        })))
        .unwrap();

        assert_eq!(candidate.url_for(MediaFormat::Video), "https://media.example.com/x.gif");
    }

    #[test]
    fn test_empty_mp4_is_ignored() {
        let candidate = MediaCandidate::from_record(record(serde_json::json!({
            "images": { "original": { "url": "https://media.example.com/x.gif", "mp4": "" } }
        })))
        .unwrap();

        assert!(candidate.video_url.is_none());
    }

    #[test]
    fn test_record_without_url_is_not_a_candidate() {
        assert!(MediaCandidate::from_record(record(serde_json::json!({ "id": "1" }))).is_none());
        assert!(MediaCandidate::from_record(record(serde_json::json!({
            "images": { "original": { "url": "  " } }
        })))
        .is_none());
        assert!(MediaCandidate::from_record(record(serde_json::json!({
            "images": { "original": { "mp4": "https://media.example.com/only.mp4" } }
        })))
        .is_none());
    }

    #[test]
    fn test_search_errors_map_to_network_errors() {
        assert!(matches!(
            SearchError::Status(429).into_network_error(),
            NetworkError::ServerError { status: 429, .. }
        ));
        assert!(matches!(
            SearchError::NoResults.into_network_error(),
            NetworkError::InvalidResponse(_)
        ));
        assert!(matches!(
            SearchError::Decode("eof".into()).into_network_error(),
            NetworkError::InvalidResponse(m) if m == "eof"
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = MediaSearchClient::new("https://api.example.com/v1/").unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/v1");
    }
}
