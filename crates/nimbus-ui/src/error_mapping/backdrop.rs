use crate::services::BackdropServiceError;
use nimbus_core::{AppError, BackdropError};

impl From<BackdropServiceError> for AppError {
    fn from(e: BackdropServiceError) -> Self {
        match e {
            BackdropServiceError::ResolveFailed(s) => {
                AppError::Backdrop(BackdropError::ResolveFailed(s))
            }
            BackdropServiceError::MediaLoad { url, reason } => {
                AppError::Backdrop(BackdropError::MediaLoadFailed { url, reason })
            }
            BackdropServiceError::NotInitialized => {
                AppError::Backdrop(BackdropError::ServiceUnavailable)
            }
        }
    }
}
