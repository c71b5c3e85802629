//! Presentation layer for the weather background.
//!
//! The host toolkit owns drawing; this crate owns the state behind it. Models
//! never block on the network: resolution runs on the tokio runtime held by
//! [`AppServices`] and results come back over a channel drained by
//! `poll_channel`.

pub mod app_services;
pub mod error_mapping;
pub mod models;
pub mod services;

pub use app_services::AppServices;
pub use models::backdrop_model::{
    BackdropModel, BackdropProps, BackdropState, BackdropView, MediaKind, MediaLayer,
    OverlayLayer,
};
