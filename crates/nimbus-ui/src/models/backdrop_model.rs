//! Full-viewport weather background behind the widget.
//!
//! `BackdropModel` tracks which weather key is shown, asks the resolver for a
//! URL when the key (or credential/format) changes, and exposes a
//! [`BackdropView`] snapshot for the host to draw: a loading gradient, the
//! media layer with its crossfade opacity, and readability overlays.

use std::sync::mpsc;
use std::sync::Arc;

use nimbus_backdrop::{BackdropResolver, MediaFormat};
use nimbus_core::AppError;

use crate::services::{
    request_backdrop_resolve, BackdropServiceError, BackdropServiceMessage, ResolveRequest,
};

/// Crossfade duration once the media element reports it has loaded.
pub const FADE_DURATION_MS: u32 = 700;

/// Layers drawn over the media so foreground text stays legible.
pub const READABILITY_OVERLAYS: [OverlayLayer; 2] = [
    OverlayLayer {
        name: "scrim",
        opacity: 0.35,
    },
    OverlayLayer {
        name: "vignette",
        opacity: 0.2,
    },
];

/// Inputs supplied by the surrounding widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackdropProps {
    pub weather_key: Option<String>,
    /// Human-readable condition, used for the accessibility label
    pub description: Option<String>,
    pub prefer_video: bool,
    /// Overrides the configured media-search credential
    pub credential: Option<String>,
}

impl BackdropProps {
    pub fn for_key(weather_key: impl Into<String>) -> Self {
        Self {
            weather_key: Some(weather_key.into()),
            ..Self::default()
        }
    }

    fn format(&self) -> MediaFormat {
        MediaFormat::from_prefer_video(self.prefer_video)
    }

    fn requests_same_media(&self, other: &Self) -> bool {
        self.weather_key == other.weather_key
            && self.credential == other.credential
            && self.prefer_video == other.prefer_video
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackdropState {
    /// No weather key; nothing requested
    Idle,
    /// Waiting on the resolver
    Loading,
    /// A URL is assigned to the media layer
    Displaying,
    /// Resolution or media loading failed; the gradient stays up
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Guess the element type from the URL's file extension.
    pub fn from_url(url: &str) -> Self {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if [".mp4", ".webm", ".mov"].iter().any(|ext| path.ends_with(ext)) {
            Self::Video
        } else {
            Self::Image
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaLayer {
    pub url: String,
    pub kind: MediaKind,
    /// 0.0 until the media element reports a successful load, then 1.0
    pub opacity: f32,
    pub fade_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayer {
    pub name: &'static str,
    pub opacity: f32,
}

/// Snapshot of everything the host needs to draw the background.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropView {
    pub state: BackdropState,
    pub show_gradient: bool,
    /// True while loading with nothing to show yet
    pub loading: bool,
    pub media: Option<MediaLayer>,
    pub overlays: Vec<OverlayLayer>,
    pub error_message: Option<String>,
    pub accessibility_label: String,
}

#[derive(Debug)]
pub struct BackdropModel {
    props: BackdropProps,
    state: BackdropState,
    media_url: Option<String>,
    media_loaded: bool,
    error: Option<BackdropServiceError>,
    /// Bumped on every reload; replies tagged with an older value are stale
    generation: u64,
    resolver: Arc<BackdropResolver>,
    runtime: Option<tokio::runtime::Handle>,
    tx: mpsc::Sender<BackdropServiceMessage>,
    rx: mpsc::Receiver<BackdropServiceMessage>,
}

impl BackdropModel {
    pub fn new(resolver: Arc<BackdropResolver>, runtime: Option<tokio::runtime::Handle>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            props: BackdropProps::default(),
            state: BackdropState::Idle,
            media_url: None,
            media_loaded: false,
            error: None,
            generation: 0,
            resolver,
            runtime,
            tx,
            rx,
        }
    }

    pub fn props(&self) -> &BackdropProps {
        &self.props
    }

    pub fn state(&self) -> BackdropState {
        self.state
    }

    pub fn media_url(&self) -> Option<&str> {
        self.media_url.as_deref()
    }

    pub fn error(&self) -> Option<&BackdropServiceError> {
        self.error.as_ref()
    }

    /// Apply new props. Only a change of key, credential, or format preference
    /// triggers a new resolve; description-only changes just relabel.
    pub fn set_props(&mut self, props: BackdropProps) {
        let reload = !props.requests_same_media(&self.props);
        self.props = props;
        if reload {
            self.reload();
        }
    }

    pub fn set_weather_key(&mut self, weather_key: Option<String>) {
        let props = BackdropProps {
            weather_key,
            ..self.props.clone()
        };
        self.set_props(props);
    }

    fn reload(&mut self) {
        self.generation += 1;
        self.error = None;

        let Some(key) = self.props.weather_key.clone() else {
            self.state = BackdropState::Idle;
            self.media_url = None;
            self.media_loaded = false;
            return;
        };

        if let Some(url) = self.resolver.peek(&key) {
            tracing::debug!("Background for {} already resolved", key);
            self.show(url);
            return;
        }

        self.state = BackdropState::Loading;
        request_backdrop_resolve(
            &self.tx,
            self.runtime.as_ref(),
            self.resolver.clone(),
            ResolveRequest {
                generation: self.generation,
                weather_key: key,
                credential: self.props.credential.clone(),
                format: self.props.format(),
            },
        );
    }

    fn show(&mut self, url: String) {
        if self.media_url.as_deref() != Some(url.as_str()) {
            self.media_loaded = false;
            self.media_url = Some(url);
        }
        self.state = BackdropState::Displaying;
        self.error = None;
    }

    fn fail(&mut self, error: BackdropServiceError) {
        tracing::error!("Weather background error: {}", error);
        self.state = BackdropState::Errored;
        self.error = Some(error);
    }

    /// Drain finished resolves. Returns true if the model changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;

        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                BackdropServiceMessage::ResolveDone {
                    generation,
                    weather_key,
                    result,
                } => {
                    if generation != self.generation {
                        tracing::debug!("Dropping stale background for {}", weather_key);
                        continue;
                    }

                    match result {
                        Ok(url) => self.show(url),
                        Err(e) => self.fail(e),
                    }
                    changed = true;
                }
            }
        }

        changed
    }

    /// The media element finished loading `url`; start the fade-in.
    pub fn on_media_loaded(&mut self, url: &str) -> bool {
        if self.state != BackdropState::Displaying || self.media_url.as_deref() != Some(url) {
            return false;
        }
        self.media_loaded = true;
        true
    }

    /// The media element could not load `url`. Recorded locally; the resolver
    /// is not asked again. Errors for media that is being replaced are ignored.
    pub fn on_media_error(&mut self, url: &str, reason: &str) -> bool {
        if self.state != BackdropState::Displaying || self.media_url.as_deref() != Some(url) {
            return false;
        }
        self.media_loaded = false;
        self.fail(BackdropServiceError::MediaLoad {
            url: url.to_string(),
            reason: reason.to_string(),
        });
        true
    }

    pub fn view(&self) -> BackdropView {
        let media = self.media_url.as_ref().map(|url| MediaLayer {
            url: url.clone(),
            kind: MediaKind::from_url(url),
            opacity: if self.media_loaded { 1.0 } else { 0.0 },
            fade_ms: FADE_DURATION_MS,
        });

        let overlays = if media.is_some() {
            READABILITY_OVERLAYS.to_vec()
        } else {
            Vec::new()
        };

        let accessibility_label = match self.props.description.as_deref() {
            Some(d) if !d.trim().is_empty() => format!("{} weather background", d.trim()),
            _ => "Weather background".to_string(),
        };

        BackdropView {
            state: self.state,
            show_gradient: self.state != BackdropState::Idle && !self.media_loaded,
            loading: self.state == BackdropState::Loading && self.media_url.is_none(),
            media,
            overlays,
            error_message: self
                .error
                .clone()
                .map(|e| AppError::from(e).user_message().to_string()),
            accessibility_label,
        }
    }
}
