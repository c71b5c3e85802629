//! Weather background resolution for Nimbus
//!
//! Turns a weather key into a displayable media URL using a media-search API,
//! with static fallback images and a per-key in-memory cache.

pub mod cache;
pub mod resolver;
pub mod search;
pub mod tables;
pub mod types;

pub use cache::BackdropCache;
pub use resolver::BackdropResolver;
pub use search::{MediaCandidate, MediaSearchClient, SearchError};
pub use types::*;
