//! Background backend: async URL resolution.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use nimbus_backdrop::{BackdropResolver, MediaFormat};

/// Failures the presenter can observe.
///
/// Search failures are not here: the resolver already turned them into a
/// fallback URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackdropServiceError {
    #[error("Background resolution failed: {0}")]
    ResolveFailed(String),
    #[error("Background media failed to load: {url} ({reason})")]
    MediaLoad { url: String, reason: String },
    #[error("Background service not initialized")]
    NotInitialized,
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum BackdropServiceMessage {
    ResolveDone {
        generation: u64,
        weather_key: String,
        result: Result<String, BackdropServiceError>,
    },
}

/// One resolve call, tagged with the model generation that asked for it.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub generation: u64,
    pub weather_key: String,
    pub credential: Option<String>,
    pub format: MediaFormat,
}

/// Resolve a background URL asynchronously.
/// Sends `ResolveDone` on the channel when complete; a panicking resolver is
/// reported as `ResolveFailed` rather than tearing down the runtime.
pub fn request_resolve(
    tx: &Sender<BackdropServiceMessage>,
    runtime: Option<&tokio::runtime::Handle>,
    resolver: Arc<BackdropResolver>,
    request: ResolveRequest,
) {
    let tx = tx.clone();
    let runtime = match runtime {
        Some(r) => r,
        None => {
            let _ = tx.send(BackdropServiceMessage::ResolveDone {
                generation: request.generation,
                weather_key: request.weather_key,
                result: Err(BackdropServiceError::NotInitialized),
            });
            return;
        }
    };

    let ResolveRequest {
        generation,
        weather_key,
        credential,
        format,
    } = request;

    let task_key = weather_key.clone();
    let task = runtime.spawn(async move {
        resolver
            .resolve(&task_key, credential.as_deref(), format)
            .await
    });

    runtime.spawn(async move {
        let result = task
            .await
            .map_err(|e| BackdropServiceError::ResolveFailed(e.to_string()));

        if let Err(e) = &result {
            tracing::error!("Background resolve for {} failed: {}", weather_key, e);
        }

        let _ = tx.send(BackdropServiceMessage::ResolveDone {
            generation,
            weather_key,
            result,
        });
    });
}
