//! Event contracts between the arbiter and the presentation layer.
//!
//! The arbiter never renders anything; it publishes these events and the
//! presentation layer draws the ball, the answer and the instructions.
//! Shared types keep producer and consumer from drifting apart on field names.

mod bus;
mod mode;

pub use bus::{EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus};
pub use mode::InputMode;

use serde::{Deserialize, Serialize};

/// An event with a fixed topic.
pub trait BallEvent {
    const TOPIC: &'static str;
}

/// A new answer is on display.
///
/// Also used for user-visible messages that replace the answer, such as the
/// permission-denied notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerChangedEvent {
    pub answer: String,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub ts_ms: i64,
}

impl BallEvent for AnswerChangedEvent {
    const TOPIC: &'static str = event_names::ANSWER_CHANGED;
}

/// The active input mode changed (or was decided at startup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeChangedEvent {
    pub mode: InputMode,
    /// Instruction line for the new mode.
    pub instructions: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ModeChangedEvent {
    pub fn for_mode(mode: InputMode) -> Self {
        Self {
            mode,
            instructions: mode.instructions().to_string(),
            hint: mode.hint().map(str::to_string),
        }
    }
}

impl BallEvent for ModeChangedEvent {
    const TOPIC: &'static str = event_names::MODE_CHANGED;
}

/// The ball started or stopped its shake animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakingChangedEvent {
    pub shaking: bool,
}

impl BallEvent for ShakingChangedEvent {
    const TOPIC: &'static str = event_names::SHAKING_CHANGED;
}

/// Something the user should be told that is not an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeEvent {
    pub message: String,
    /// Machine-readable cause, e.g. the permission error text.
    #[serde(default)]
    pub reason: Option<String>,
}

impl BallEvent for NoticeEvent {
    const TOPIC: &'static str = event_names::NOTICE;
}

/// Event names as constants to prevent typos.
pub mod event_names {
    pub const ANSWER_CHANGED: &str = "ball:answer_changed";
    pub const MODE_CHANGED: &str = "ball:mode_changed";
    pub const SHAKING_CHANGED: &str = "ball:shaking_changed";
    pub const NOTICE: &str = "ball:notice";
}
