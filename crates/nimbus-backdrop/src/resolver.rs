//! Weather key -> background URL resolution.
//!
//! Lookup order: cache, then (with a credential) one media search, then the
//! static fallback table. Every path writes its answer to the cache and none
//! of them return an error.

use nimbus_core::BackdropConfig;
use rand::seq::SliceRandom;
use std::sync::Arc;

use crate::cache::BackdropCache;
use crate::search::{MediaSearchClient, SearchError};
use crate::tables;
use crate::types::MediaFormat;

#[derive(Debug, Clone)]
pub struct BackdropResolver {
    search: Arc<MediaSearchClient>,
    cache: BackdropCache,
    default_credential: Option<String>,
}

impl BackdropResolver {
    /// `default_credential` is used whenever a call passes no credential of its own.
    pub fn new(
        search: MediaSearchClient,
        cache: BackdropCache,
        default_credential: Option<String>,
    ) -> Self {
        Self {
            search: Arc::new(search),
            cache,
            default_credential: non_blank(default_credential.as_deref()).map(str::to_string),
        }
    }

    /// Build a resolver from configuration, picking up the API key from the
    /// config file or environment.
    pub fn from_config(config: &BackdropConfig, cache: BackdropCache) -> Result<Self, SearchError> {
        let search = MediaSearchClient::from_config(config)?;
        Ok(Self::new(search, cache, config.resolved_api_key()))
    }

    pub fn cache(&self) -> &BackdropCache {
        &self.cache
    }

    pub fn has_default_credential(&self) -> bool {
        self.default_credential.is_some()
    }

    /// Resolve `weather_key` to a background URL.
    ///
    /// At most one network request is made per call, and only on a cache miss
    /// with a credential available. Search failures of any kind resolve to the
    /// key's fallback image.
    pub async fn resolve(
        &self,
        weather_key: &str,
        credential: Option<&str>,
        format: MediaFormat,
    ) -> String {
        if let Some(url) = self.cache.get(weather_key) {
            tracing::debug!("Background cache hit for {}", weather_key);
            return url;
        }

        let api_key = match non_blank(credential).or(self.default_credential.as_deref()) {
            Some(key) => key,
            None => {
                tracing::debug!("No media-search credential; using fallback for {}", weather_key);
                return self.store_fallback(weather_key);
            }
        };

        let term = tables::search_term(weather_key);
        let candidates = match self.search.search(api_key, term, format).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(
                    "Background search for {} unavailable, using fallback: {}",
                    weather_key,
                    e.into_network_error()
                );
                return self.store_fallback(weather_key);
            }
        };

        // Unreachable today: `search` reports an empty list as `NoResults`.
        let Some(chosen) = candidates.choose(&mut rand::thread_rng()) else {
            return self.store_fallback(weather_key);
        };

        let url = chosen.url_for(format).to_string();
        tracing::debug!("Resolved background for {}: {}", weather_key, url);
        self.cache.insert(weather_key, &url);
        url
    }

    /// Cached URL for `weather_key` without touching the network.
    pub fn peek(&self, weather_key: &str) -> Option<String> {
        self.cache.get(weather_key)
    }

    /// Forget every resolved background.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Resolve and cache `weather_key` unless it is already cached.
    pub async fn warm(&self, weather_key: &str, credential: Option<&str>, format: MediaFormat) {
        if self.peek(weather_key).is_none() {
            let _ = self.resolve(weather_key, credential, format).await;
        }
    }

    fn store_fallback(&self, weather_key: &str) -> String {
        let url = tables::fallback_url(weather_key);
        self.cache.insert(weather_key, url);
        url.to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
