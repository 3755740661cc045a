//! Input mode arbitration for shakeball.
//!
//! Ties the pieces together: capability detection picks the input channel,
//! the classifier turns motion into shakes, and every trigger, whatever its
//! source, goes through one cooldown-guarded action that picks a new answer.
//!
//! # Example
//!
//! ```ignore
//! use shakeball_application::{spawn_arbiter, Settings};
//! use shakeball_detect::NullPlatform;
//! use shakeball_events::NullEventBus;
//! use shakeball_input::{InputEvent, Key};
//! use std::sync::Arc;
//!
//! let handle = spawn_arbiter(Settings::default(), Arc::new(NullPlatform), Arc::new(NullEventBus));
//! handle.dispatch(InputEvent::KeyDown(Key::Space))?;
//! handle.flush().await?;
//! println!("{}", handle.snapshot().answer);
//! ```

mod arbiter;
mod constants;
mod error;
mod runtime;
mod settings;

pub use arbiter::{Arbiter, Effect, Snapshot, Transition, TriggerSource};
pub use constants::*;
pub use error::{ArbiterError, SettingsError};
pub use runtime::ArbiterHandle;
pub use settings::Settings;

use shakeball_detect::{MotionDetector, MotionPlatformRef};
use shakeball_events::EventBusRef;
use shakeball_input::ListenerRegistry;

/// Build an arbiter for the platform and start it on the current runtime.
pub fn spawn_arbiter(
    settings: Settings,
    platform: MotionPlatformRef,
    event_bus: EventBusRef,
) -> ArbiterHandle {
    let detector = MotionDetector::new(platform, ListenerRegistry::new());
    ArbiterHandle::spawn(Arbiter::new(settings, detector, event_bus))
}
