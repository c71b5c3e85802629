//! Application services shared by the background models.
//!
//! `AppServices` owns the tokio runtime and the background resolver (and with
//! it the resolved-URL cache). It is constructed explicitly by the host and
//! handed to whatever creates models; there is no global instance, so tests
//! can build as many independent copies as they need.

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;

use nimbus_backdrop::{BackdropCache, BackdropResolver};
use nimbus_core::BackdropConfig;

use crate::models::backdrop_model::BackdropModel;

pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    /// Resolved background URLs; survives resolver re-initialization
    backdrop_cache: BackdropCache,

    /// Background resolver
    backdrop_resolver: RwLock<Option<Arc<BackdropResolver>>>,
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices")
            .field("backdrop_cache_entries", &self.backdrop_cache.len())
            .field("backdrop_ready", &self.backdrop_resolver.read().is_some())
            .finish()
    }
}

impl AppServices {
    /// Create the services container with its own runtime.
    pub fn new() -> Result<Arc<Self>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("nimbus-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        Ok(Arc::new(Self {
            runtime,
            backdrop_cache: BackdropCache::new(),
            backdrop_resolver: RwLock::new(None),
        }))
    }

    /// Create the container and initialize the background resolver from config.
    pub fn with_config(config: &BackdropConfig) -> Result<Arc<Self>> {
        let services = Self::new()?;
        services.init_backdrop(config);
        Ok(services)
    }

    /// Get the tokio runtime handle.
    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Drop the resolver so no new models can be created. Resolves already
    /// in flight still complete and write to the cache.
    pub fn shutdown(&self) {
        *self.backdrop_resolver.write() = None;
        tracing::info!("AppServices shutdown complete");
    }

    // =========== Background Resolver ===========

    pub fn backdrop_cache(&self) -> &BackdropCache {
        &self.backdrop_cache
    }

    /// Get the background resolver if initialized.
    pub fn backdrop_resolver(&self) -> Option<Arc<BackdropResolver>> {
        self.backdrop_resolver.read().clone()
    }

    /// Set or replace the background resolver.
    pub fn set_backdrop_resolver(&self, resolver: Option<Arc<BackdropResolver>>) {
        *self.backdrop_resolver.write() = resolver;
    }

    /// Initialize the background resolver from configuration.
    ///
    /// The resolver shares this container's cache, so re-initializing after a
    /// settings change keeps backgrounds already resolved.
    pub fn init_backdrop(&self, config: &BackdropConfig) -> bool {
        match BackdropResolver::from_config(config, self.backdrop_cache.clone()) {
            Ok(resolver) => {
                if resolver.has_default_credential() {
                    tracing::info!(
                        "Background resolver initialized with search API: {}",
                        config.search_base_url
                    );
                } else {
                    tracing::info!("Background resolver initialized in fallback-only mode");
                }
                self.set_backdrop_resolver(Some(Arc::new(resolver)));
                true
            }
            Err(e) => {
                tracing::error!("Failed to create background resolver: {}", e);
                false
            }
        }
    }

    /// Create a background model wired to this container's resolver and runtime.
    pub fn backdrop_model(&self) -> Option<BackdropModel> {
        let resolver = self.backdrop_resolver()?;
        Some(BackdropModel::new(resolver, Some(self.runtime())))
    }
}
