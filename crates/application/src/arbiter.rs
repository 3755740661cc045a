//! Input mode state machine.
//!
//! Pure decision logic: every handler runs to completion and returns the
//! asynchronous work it wants done as [`Effect`]s. The runtime performs the
//! effects and feeds their outcomes back in as [`Transition`]s.
//!
//! ```text
//!                 permission granted
//!   KEYBOARD_POINTER ───────────────────▶ MOTION
//!          ▲                                │
//!          └────────────────────────────────┘
//!                 permission failed
//! ```

use serde::Serialize;
use shakeball_answers::AnswerSet;
use shakeball_detect::{Detection, MotionDetector, MotionPlatformRef};
use shakeball_events::{
    AnswerChangedEvent, EventBus, EventBusRef, InputMode, ModeChangedEvent, NoticeEvent,
    ShakingChangedEvent,
};
use shakeball_input::{InputEvent, ListenerGuard, ListenerKind, ListenerRegistry, ListenerSet};
use shakeball_motion::ShakeClassifier;
use std::time::Duration;

use crate::constants::{GREETING, PERMISSION_DENIED_MESSAGE};
use crate::settings::Settings;

/// Listeners held while in keyboard/pointer mode.
const KEYBOARD_POINTER_LISTENERS: &[ListenerKind] = &[ListenerKind::KeyDown, ListenerKind::Click];

/// Asynchronous work requested by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the platform for motion access; answer with a permission transition.
    RequestPermission,
    /// Wait, then answer with [`Transition::CooldownElapsed`].
    StartCooldown(Duration),
}

/// Completion of an [`Effect`].
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    PermissionGranted,
    PermissionDenied { reason: String },
    CooldownElapsed,
}

/// What produced a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Key,
    Click,
    Shake,
}

impl TriggerSource {
    fn label(&self) -> &'static str {
        match self {
            TriggerSource::Key => "key",
            TriggerSource::Click => "click",
            TriggerSource::Shake => "shake",
        }
    }
}

/// Observable presentation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: InputMode,
    /// Instruction line for the active mode.
    pub instructions: &'static str,
    /// Current answer, or the message standing in for one.
    pub answer: String,
    /// True for the cooldown window after a trigger.
    pub shaking: bool,
    /// A permission request is in flight.
    pub awaiting_permission: bool,
}

/// Coordinates input channels and the shared trigger.
pub struct Arbiter {
    settings: Settings,
    answers: AnswerSet,
    detector: MotionDetector,
    event_bus: EventBusRef,
    mode: InputMode,
    answer: String,
    shake_in_progress: bool,
    permission_pending: bool,
    started: bool,
    /// Present only while in motion mode; replaced on every (re)entry.
    classifier: Option<ShakeClassifier>,
    mode_listeners: Option<ListenerSet>,
    permission_listener: Option<ListenerGuard>,
}

impl Arbiter {
    /// Create an arbiter in keyboard/pointer mode showing the greeting.
    ///
    /// Nothing is attached until [`Arbiter::start`].
    pub fn new(settings: Settings, detector: MotionDetector, event_bus: EventBusRef) -> Self {
        Self {
            settings,
            answers: AnswerSet::default(),
            detector,
            event_bus,
            mode: InputMode::KeyboardPointer,
            answer: GREETING.to_string(),
            shake_in_progress: false,
            permission_pending: false,
            started: false,
            classifier: None,
            mode_listeners: None,
            permission_listener: None,
        }
    }

    /// Replace the answer set triggers draw from.
    pub fn with_answers(mut self, answers: AnswerSet) -> Self {
        self.answers = answers;
        self
    }

    /// Active input mode.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Text on display: the greeting, an answer or the denial message.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// True during the cooldown after a trigger.
    pub fn is_shaking(&self) -> bool {
        self.shake_in_progress
    }

    /// Registry the arbiter's listeners are attached to.
    pub fn registry(&self) -> &ListenerRegistry {
        self.detector.registry()
    }

    pub fn platform(&self) -> MotionPlatformRef {
        self.detector.platform()
    }

    /// Current presentation state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            instructions: self.mode.instructions(),
            answer: self.answer.clone(),
            shaking: self.shake_in_progress,
            awaiting_permission: self.permission_pending,
        }
    }

    /// Detect motion capability and install the initial listeners.
    ///
    /// Calling it again is a no-op.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.started {
            return Vec::new();
        }
        self.started = true;

        match self.detector.detect() {
            Detection::Unsupported => self.enter_keyboard_pointer(),
            Detection::AwaitingGesture(guard) => {
                self.enter_keyboard_pointer();
                self.permission_listener = Some(guard);
            }
            Detection::Armed(guard) => self.enter_motion(Some(guard)),
        }
        self.bus().publish(&ModeChangedEvent::for_mode(self.mode));

        Vec::new()
    }

    /// Handle one raw input event.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<Effect> {
        match event {
            InputEvent::KeyDown(key) => {
                if self.mode == InputMode::KeyboardPointer
                    && self.listening(ListenerKind::KeyDown)
                    && key == self.settings.activate_key
                {
                    self.trigger(TriggerSource::Key)
                } else {
                    Vec::new()
                }
            }
            InputEvent::Click => {
                let mut effects = Vec::new();

                // One-shot: detach before the request is even issued.
                if let Some(guard) = self.permission_listener.take() {
                    guard.release();
                    self.permission_pending = true;
                    effects.push(Effect::RequestPermission);
                }

                if self.mode == InputMode::KeyboardPointer && self.listening(ListenerKind::Click) {
                    effects.extend(self.trigger(TriggerSource::Click));
                }
                effects
            }
            InputEvent::Motion(sample) => {
                let shook = self
                    .classifier
                    .as_mut()
                    .is_some_and(|classifier| classifier.feed(&sample).is_shake());
                if shook && self.mode == InputMode::Motion {
                    self.trigger(TriggerSource::Shake)
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Handle the outcome of a previously returned effect.
    pub fn handle_transition(&mut self, transition: Transition) -> Vec<Effect> {
        match transition {
            Transition::PermissionGranted => {
                self.permission_pending = false;
                if self.mode != InputMode::Motion {
                    self.enter_motion(None);
                    self.bus().publish(&ModeChangedEvent::for_mode(self.mode));
                }
            }
            Transition::PermissionDenied { reason } => {
                self.permission_pending = false;
                tracing::warn!(%reason, "falling back to keyboard/pointer input");

                if self.mode != InputMode::KeyboardPointer {
                    self.enter_keyboard_pointer();
                }
                self.bus().publish(&ModeChangedEvent::for_mode(self.mode));

                self.set_answer(PERMISSION_DENIED_MESSAGE.to_string());
                self.bus().publish(&NoticeEvent {
                    message: PERMISSION_DENIED_MESSAGE.to_string(),
                    reason: Some(reason),
                });

                // No automatic retry: the next click asks again.
                if self.permission_listener.is_none() {
                    self.permission_listener = Some(self.detector.arm_gesture());
                }
            }
            Transition::CooldownElapsed => {
                self.shake_in_progress = false;
                self.bus().publish(&ShakingChangedEvent { shaking: false });
            }
        }
        Vec::new()
    }

    /// Release every listener. The arbiter ignores all input afterwards.
    pub fn teardown(&mut self) {
        self.mode_listeners = None;
        self.permission_listener = None;
        self.classifier = None;
        tracing::info!("arbiter torn down");
    }

    fn bus(&self) -> &(dyn EventBus + 'static) {
        self.event_bus.as_ref()
    }

    fn listening(&self, kind: ListenerKind) -> bool {
        self.mode_listeners
            .as_ref()
            .is_some_and(|set| set.contains(kind))
    }

    fn trigger(&mut self, source: TriggerSource) -> Vec<Effect> {
        if self.shake_in_progress {
            tracing::debug!(source = source.label(), "trigger dropped during cooldown");
            return Vec::new();
        }

        self.shake_in_progress = true;
        self.bus().publish(&ShakingChangedEvent { shaking: true });

        let answer = self.answers.select();
        tracing::info!(source = source.label(), answer, "new answer");
        self.set_answer(answer.to_string());

        vec![Effect::StartCooldown(self.settings.cooldown())]
    }

    fn set_answer(&mut self, answer: String) {
        self.answer = answer;
        self.bus().publish(&AnswerChangedEvent {
            answer: self.answer.clone(),
            ts_ms: chrono::Utc::now().timestamp_millis(),
        });
    }

    fn enter_keyboard_pointer(&mut self) {
        self.mode_listeners = None;
        self.classifier = None;
        self.mode_listeners = Some(ListenerSet::attach(
            self.detector.registry(),
            KEYBOARD_POINTER_LISTENERS,
        ));
        self.set_mode(InputMode::KeyboardPointer);
    }

    fn enter_motion(&mut self, armed: Option<ListenerGuard>) {
        self.mode_listeners = None;
        let guard = armed.unwrap_or_else(|| self.detector.arm_motion());
        let mut listeners = ListenerSet::new();
        listeners.push(guard);
        self.mode_listeners = Some(listeners);
        self.classifier = Some(ShakeClassifier::new(self.settings.classifier));
        self.set_mode(InputMode::Motion);
    }

    fn set_mode(&mut self, mode: InputMode) {
        if self.mode != mode {
            tracing::info!(from = %self.mode, to = %mode, "input mode changed");
        }
        self.mode = mode;
    }
}

impl std::fmt::Debug for Arbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arbiter")
            .field("mode", &self.mode)
            .field("shake_in_progress", &self.shake_in_progress)
            .field("permission_pending", &self.permission_pending)
            .field("listeners", &self.registry().attached())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakeball_detect::{NullPlatform, SimulatedPlatform, SimulatedResponse};
    use shakeball_events::{event_names, InMemoryEventBus};
    use shakeball_input::Key;
    use shakeball_motion::MotionSample;
    use std::sync::Arc;

    fn arbiter_with<P: shakeball_detect::MotionPlatform + 'static>(
        platform: P,
    ) -> (Arbiter, Arc<InMemoryEventBus>) {
        let bus = Arc::new(InMemoryEventBus::new());
        let detector = MotionDetector::new(Arc::new(platform), ListenerRegistry::new());
        let arbiter = Arbiter::new(Settings::default(), detector, bus.clone());
        (arbiter, bus)
    }

    fn space() -> InputEvent {
        InputEvent::KeyDown(Key::Space)
    }

    #[test]
    fn test_unsupported_starts_keyboard_pointer() {
        let (mut arbiter, bus) = arbiter_with(NullPlatform);
        assert!(arbiter.start().is_empty());

        assert_eq!(arbiter.mode(), InputMode::KeyboardPointer);
        assert_eq!(arbiter.answer(), GREETING);
        assert!(arbiter.registry().is_attached(ListenerKind::KeyDown));
        assert!(arbiter.registry().is_attached(ListenerKind::Click));
        assert!(!arbiter.registry().is_attached(ListenerKind::PermissionClick));
        assert_eq!(
            bus.last::<ModeChangedEvent>().unwrap().mode,
            InputMode::KeyboardPointer
        );

        // A click never turns into a permission request.
        let effects = arbiter.handle_input(InputEvent::Click);
        assert!(!effects.contains(&Effect::RequestPermission));
        assert_eq!(arbiter.mode(), InputMode::KeyboardPointer);
    }

    #[test]
    fn test_trigger_guarded_by_cooldown() {
        let (mut arbiter, bus) = arbiter_with(NullPlatform);
        arbiter.start();

        let effects = arbiter.handle_input(space());
        assert_eq!(
            effects,
            vec![Effect::StartCooldown(Duration::from_millis(1000))]
        );
        assert!(arbiter.is_shaking());
        assert!(AnswerSet::default().contains(arbiter.answer()));

        for _ in 0..5 {
            assert!(arbiter.handle_input(space()).is_empty());
            assert!(arbiter.handle_input(InputEvent::Click).is_empty());
        }
        assert_eq!(bus.events_for(event_names::ANSWER_CHANGED).len(), 1);

        arbiter.handle_transition(Transition::CooldownElapsed);
        assert!(!arbiter.is_shaking());
        assert_eq!(arbiter.handle_input(space()).len(), 1);
        assert_eq!(bus.events_for(event_names::ANSWER_CHANGED).len(), 2);
    }

    #[test]
    fn test_trigger_publishes_shaking_before_answer() {
        let (arbiter, bus) = arbiter_with(NullPlatform);
        let mut arbiter = arbiter.with_answers(AnswerSet::new(&["Да"]).unwrap());
        arbiter.start();
        bus.clear();

        arbiter.handle_input(InputEvent::Click);
        assert_eq!(arbiter.answer(), "Да");

        let topics: Vec<String> = bus.events().into_iter().map(|e| e.topic).collect();
        assert_eq!(
            topics,
            vec![event_names::SHAKING_CHANGED, event_names::ANSWER_CHANGED]
        );
    }

    #[test]
    fn test_snapshot_instructions_follow_mode() {
        let (mut arbiter, _bus) = arbiter_with(SimulatedPlatform::ungated());
        assert_eq!(
            arbiter.snapshot().instructions,
            InputMode::KeyboardPointer.instructions()
        );
        arbiter.start();
        assert_eq!(
            arbiter.snapshot().instructions,
            InputMode::Motion.instructions()
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        let (mut arbiter, _bus) = arbiter_with(NullPlatform);
        arbiter.start();
        assert!(arbiter
            .handle_input(InputEvent::KeyDown(Key::Enter))
            .is_empty());
        assert!(!arbiter.is_shaking());
    }

    #[test]
    fn test_ungated_enters_motion() {
        let (mut arbiter, _bus) = arbiter_with(SimulatedPlatform::ungated());
        arbiter.start();

        assert_eq!(arbiter.mode(), InputMode::Motion);
        assert_eq!(
            arbiter.registry().attached(),
            vec![ListenerKind::DeviceMotion]
        );

        // Keyboard and clicks do nothing in motion mode.
        assert!(arbiter.handle_input(space()).is_empty());
        assert!(arbiter.handle_input(InputEvent::Click).is_empty());

        assert!(arbiter
            .handle_input(InputEvent::Motion(MotionSample::new(0.1, 0.1, 0.1, 0)))
            .is_empty());
        let effects =
            arbiter.handle_input(InputEvent::Motion(MotionSample::new(20.0, 0.1, 0.1, 200)));
        assert_eq!(effects.len(), 1);
        assert!(arbiter.is_shaking());
    }

    #[test]
    fn test_gated_click_requests_permission_once() {
        let (mut arbiter, _bus) = arbiter_with(SimulatedPlatform::gated(SimulatedResponse::Grant));
        arbiter.start();

        assert_eq!(arbiter.mode(), InputMode::KeyboardPointer);
        assert!(arbiter
            .registry()
            .is_attached(ListenerKind::PermissionClick));

        let effects = arbiter.handle_input(InputEvent::Click);
        assert!(effects.contains(&Effect::RequestPermission));
        assert!(arbiter.snapshot().awaiting_permission);
        assert!(!arbiter
            .registry()
            .is_attached(ListenerKind::PermissionClick));

        // The listener was one-shot.
        arbiter.handle_transition(Transition::CooldownElapsed);
        let effects = arbiter.handle_input(InputEvent::Click);
        assert!(!effects.contains(&Effect::RequestPermission));

        arbiter.handle_transition(Transition::PermissionGranted);
        assert_eq!(arbiter.mode(), InputMode::Motion);
        assert!(!arbiter.snapshot().awaiting_permission);
        assert_eq!(
            arbiter.registry().attached(),
            vec![ListenerKind::DeviceMotion]
        );
    }

    #[test]
    fn test_permission_denied_falls_back() {
        let (mut arbiter, bus) = arbiter_with(SimulatedPlatform::gated(SimulatedResponse::Deny));
        arbiter.start();
        arbiter.handle_input(InputEvent::Click);
        arbiter.handle_transition(Transition::PermissionDenied {
            reason: "denied".to_string(),
        });

        assert_eq!(arbiter.mode(), InputMode::KeyboardPointer);
        assert_eq!(arbiter.answer(), PERMISSION_DENIED_MESSAGE);
        assert_eq!(
            bus.last::<NoticeEvent>().unwrap().message,
            PERMISSION_DENIED_MESSAGE
        );
        // Re-armed for a manual retry.
        assert!(arbiter
            .registry()
            .is_attached(ListenerKind::PermissionClick));
    }

    #[test]
    fn test_denied_while_in_motion_returns_to_keyboard() {
        let (mut arbiter, _bus) = arbiter_with(SimulatedPlatform::ungated());
        arbiter.start();
        assert_eq!(arbiter.mode(), InputMode::Motion);

        arbiter.handle_transition(Transition::PermissionDenied {
            reason: "revoked".to_string(),
        });
        assert_eq!(arbiter.mode(), InputMode::KeyboardPointer);
        assert!(!arbiter.registry().is_attached(ListenerKind::DeviceMotion));
        assert!(arbiter.registry().is_attached(ListenerKind::KeyDown));
    }

    #[test]
    fn test_motion_entry_resets_classifier() {
        let (mut arbiter, _bus) = arbiter_with(SimulatedPlatform::gated(SimulatedResponse::Grant));
        arbiter.start();
        arbiter.handle_input(InputEvent::Click);
        arbiter.handle_transition(Transition::CooldownElapsed);
        arbiter.handle_transition(Transition::PermissionGranted);

        // First sample after arming is only a baseline, however large.
        assert!(arbiter
            .handle_input(InputEvent::Motion(MotionSample::new(40.0, 40.0, 40.0, 0)))
            .is_empty());
    }

    #[test]
    fn test_teardown_releases_everything() {
        let (mut arbiter, _bus) = arbiter_with(SimulatedPlatform::gated(SimulatedResponse::Grant));
        arbiter.start();
        assert!(!arbiter.registry().is_empty());

        arbiter.teardown();
        assert!(arbiter.registry().is_empty());
        assert!(arbiter.handle_input(space()).is_empty());
    }

    #[test]
    fn test_start_is_idempotent() {
        let (mut arbiter, bus) = arbiter_with(NullPlatform);
        arbiter.start();
        arbiter.start();
        assert_eq!(arbiter.registry().count(ListenerKind::KeyDown), 1);
        assert_eq!(bus.events_for(event_names::MODE_CHANGED).len(), 1);
    }
}
