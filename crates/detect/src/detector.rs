//! Capability detection and listener arming.

use shakeball_input::{ListenerGuard, ListenerKind, ListenerRegistry};
use std::sync::Arc;

use crate::platform::{MotionPlatformRef, MotionSupport};

/// What detection decided, together with the listener it attached.
#[derive(Debug)]
pub enum Detection {
    /// No motion sensing. Nothing attached; stay on keyboard/pointer.
    Unsupported,
    /// Permission must be requested from the next click. Holds the one-shot
    /// click listener.
    AwaitingGesture(ListenerGuard),
    /// Motion sensing is live. Holds the sensor listener.
    Armed(ListenerGuard),
}

impl Detection {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Detection::Unsupported => "unsupported",
            Detection::AwaitingGesture(_) => "awaiting-gesture",
            Detection::Armed(_) => "armed",
        }
    }
}

/// Decides how motion input can be obtained and attaches the matching
/// listener.
#[derive(Clone)]
pub struct MotionDetector {
    platform: MotionPlatformRef,
    registry: ListenerRegistry,
}

impl MotionDetector {
    /// Create a detector that attaches listeners to `registry`.
    pub fn new(platform: MotionPlatformRef, registry: ListenerRegistry) -> Self {
        Self { platform, registry }
    }

    /// Shared handle to the platform, for issuing permission requests.
    pub fn platform(&self) -> MotionPlatformRef {
        Arc::clone(&self.platform)
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// How the platform exposes motion events.
    pub fn support(&self) -> MotionSupport {
        self.platform.motion_support()
    }

    /// Inspect the platform and arm accordingly.
    pub fn detect(&self) -> Detection {
        let detection = match self.support() {
            MotionSupport::Unsupported => Detection::Unsupported,
            MotionSupport::Gated => Detection::AwaitingGesture(self.arm_gesture()),
            MotionSupport::Ungated => Detection::Armed(self.arm_motion()),
        };
        tracing::info!(detection = detection.label(), "motion capability detected");
        detection
    }

    /// Attach the one-shot click listener that will issue the permission
    /// request.
    pub fn arm_gesture(&self) -> ListenerGuard {
        self.registry.attach(ListenerKind::PermissionClick)
    }

    /// Attach the sensor listener.
    pub fn arm_motion(&self) -> ListenerGuard {
        self.registry.attach(ListenerKind::DeviceMotion)
    }
}

impl std::fmt::Debug for MotionDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionDetector")
            .field("support", &self.platform.motion_support())
            .field("attached", &self.registry.attached())
            .finish()
    }
}
