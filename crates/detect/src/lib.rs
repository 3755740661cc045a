//! Motion capability detection for shakeball.
//!
//! Decides at runtime whether the host can deliver motion events and how to
//! get them:
//!
//! - **Unsupported**: keyboard/pointer input only.
//! - **Gated**: arm a one-shot click listener; the click issues the
//!   permission request, and only a grant switches to motion input.
//! - **Ungated**: attach the motion listener straight away.
//!
//! Listeners are [`shakeball_input::ListenerGuard`]s, so whatever happens to
//! a request (grant, denial, error, panic) the listener it held is released.

mod detector;
mod permission;
mod platform;

pub use detector::{Detection, MotionDetector};
pub use permission::{request_motion_permission, PermissionError};
pub use platform::{
    MotionPlatform, MotionPlatformRef, MotionSupport, NullPlatform, PermissionState,
    SimulatedPlatform, SimulatedResponse,
};
