//! Platform seam for motion sensing.
//!
//! These traits abstract what the host can do, keeping detection and
//! arbitration testable without sensor hardware.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::permission::PermissionError;

/// How the platform exposes motion events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionSupport {
    /// No motion events at all.
    Unsupported,
    /// Motion events exist but need a permission granted from a user gesture.
    Gated,
    /// Motion events are available without asking.
    Ungated,
}

/// Result of a permission request that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// The platform answered without deciding.
    Prompt,
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Prompt => "prompt",
        };
        write!(f, "{}", label)
    }
}

/// Motion capability of the host.
#[async_trait]
pub trait MotionPlatform: Send + Sync {
    /// Whether, and how, motion events are available.
    fn motion_support(&self) -> MotionSupport;

    /// Ask the user for motion access.
    ///
    /// Only meaningful for [`MotionSupport::Gated`]; must be issued from a
    /// user gesture on platforms that enforce that.
    async fn request_permission(&self) -> Result<PermissionState, PermissionError>;
}

/// Shared platform reference.
pub type MotionPlatformRef = Arc<dyn MotionPlatform>;

/// Platform without motion sensing.
pub struct NullPlatform;

#[async_trait]
impl MotionPlatform for NullPlatform {
    fn motion_support(&self) -> MotionSupport {
        MotionSupport::Unsupported
    }

    async fn request_permission(&self) -> Result<PermissionState, PermissionError> {
        Err(PermissionError::Unavailable)
    }
}

/// What a [`SimulatedPlatform`] answers to permission requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulatedResponse {
    Grant,
    Deny,
    /// The request call itself fails with this message.
    Fail(String),
}

/// Scripted platform for hosts without sensors, and for tests.
#[derive(Debug)]
pub struct SimulatedPlatform {
    support: MotionSupport,
    response: SimulatedResponse,
    latency: Duration,
    requests: AtomicUsize,
}

impl SimulatedPlatform {
    pub fn new(support: MotionSupport, response: SimulatedResponse) -> Self {
        Self {
            support,
            response,
            latency: Duration::ZERO,
            requests: AtomicUsize::new(0),
        }
    }

    /// Motion available without a permission step.
    pub fn ungated() -> Self {
        Self::new(MotionSupport::Ungated, SimulatedResponse::Grant)
    }

    /// Motion behind a permission prompt that answers with `response`.
    pub fn gated(response: SimulatedResponse) -> Self {
        Self::new(MotionSupport::Gated, response)
    }

    /// Delay each permission answer, as a user reading a prompt would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of permission requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MotionPlatform for SimulatedPlatform {
    fn motion_support(&self) -> MotionSupport {
        self.support
    }

    async fn request_permission(&self) -> Result<PermissionState, PermissionError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.support == MotionSupport::Unsupported {
            return Err(PermissionError::Unavailable);
        }

        match &self.response {
            SimulatedResponse::Grant => Ok(PermissionState::Granted),
            SimulatedResponse::Deny => Ok(PermissionState::Denied),
            SimulatedResponse::Fail(message) => {
                Err(PermissionError::RequestFailed(message.clone()))
            }
        }
    }
}
