//! Motion permission requests.

use thiserror::Error;

use crate::platform::{MotionPlatform, PermissionState};

/// Why motion access could not be obtained.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The platform has no motion events to grant access to.
    #[error("motion sensing is not available on this platform")]
    Unavailable,

    /// The request call itself failed.
    #[error("motion permission request failed: {0}")]
    RequestFailed(String),

    /// The request completed without granting access.
    #[error("motion permission not granted (state: {0})")]
    NotGranted(PermissionState),
}

/// Request motion permission, treating anything short of a grant as failure.
pub async fn request_motion_permission(
    platform: &dyn MotionPlatform,
) -> Result<(), PermissionError> {
    tracing::info!("requesting motion permission");

    match platform.request_permission().await {
        Ok(PermissionState::Granted) => {
            tracing::info!("motion permission granted");
            Ok(())
        }
        Ok(state) => {
            tracing::warn!(%state, "motion permission not granted");
            Err(PermissionError::NotGranted(state))
        }
        Err(e) => {
            tracing::warn!(error = %e, "motion permission request failed");
            Err(e)
        }
    }
}
