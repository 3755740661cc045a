//! Rate-limited delta classifier.

use crate::sample::{Axes, MotionSample};
use serde::{Deserialize, Serialize};

/// Summed per-axis delta above which an accepted sample counts as a shake.
///
/// Same unit as the sensor's acceleration-including-gravity reading.
pub const DEFAULT_SHAKE_THRESHOLD: f64 = 15.0;

/// Samples arriving within this many milliseconds of the last accepted one
/// are ignored.
pub const DEFAULT_MIN_INTERVAL_MS: i64 = 100;

/// Tunables for shake classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub threshold: f64,
    pub min_interval_ms: i64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SHAKE_THRESHOLD,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
        }
    }
}

/// What the classifier remembers between samples.
///
/// Only accepted samples update it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassifierState {
    pub last: Option<Axes>,
    pub last_update_ms: Option<i64>,
}

/// Why a sample did or did not produce a shake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// An axis was missing, zero or non-finite; state untouched.
    Malformed,
    /// Arrived too soon after the last accepted sample; state untouched.
    RateLimited,
    /// First accepted sample, nothing to compare against.
    Baseline,
    /// Accepted, delta at or below the threshold.
    Still { delta: f64 },
    /// Accepted, delta above the threshold.
    Shake { delta: f64 },
}

impl SampleOutcome {
    /// Whether the sample should fire a trigger.
    pub fn is_shake(&self) -> bool {
        matches!(self, SampleOutcome::Shake { .. })
    }

    /// Whether the sample was accepted and recorded.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SampleOutcome::Malformed | SampleOutcome::RateLimited)
    }
}

fn evaluate(
    config: &ClassifierConfig,
    sample: &MotionSample,
    state: &ClassifierState,
) -> (SampleOutcome, ClassifierState) {
    let Some(current) = sample.axes() else {
        return (SampleOutcome::Malformed, *state);
    };

    if let Some(last_update) = state.last_update_ms {
        // A clock running backwards reads as "too soon".
        if sample.ts_ms.saturating_sub(last_update) <= config.min_interval_ms {
            return (SampleOutcome::RateLimited, *state);
        }
    }

    let outcome = match state.last {
        None => SampleOutcome::Baseline,
        Some(previous) => {
            let delta = current.delta(&previous);
            if delta > config.threshold {
                SampleOutcome::Shake { delta }
            } else {
                SampleOutcome::Still { delta }
            }
        }
    };

    let next = ClassifierState {
        last: Some(current),
        last_update_ms: Some(sample.ts_ms),
    };

    (outcome, next)
}

/// Classify one sample against the given state.
///
/// Returns whether the sample is a shake and the state to carry forward.
/// Rejected samples return the input state unchanged.
pub fn classify(
    config: &ClassifierConfig,
    sample: &MotionSample,
    state: ClassifierState,
) -> (bool, ClassifierState) {
    let (outcome, next) = evaluate(config, sample, &state);
    (outcome.is_shake(), next)
}

/// Stateful wrapper around [`classify`].
///
/// A fresh instance is created whenever motion input is (re)armed, which is
/// how the state gets reset.
#[derive(Debug, Clone, Default)]
pub struct ShakeClassifier {
    config: ClassifierConfig,
    state: ClassifierState,
}

impl ShakeClassifier {
    /// Create a classifier with no samples seen yet.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            state: ClassifierState::default(),
        }
    }

    /// State carried into the next sample.
    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    /// Feed one sample and report what happened to it.
    pub fn feed(&mut self, sample: &MotionSample) -> SampleOutcome {
        let (outcome, next) = evaluate(&self.config, sample, &self.state);
        self.state = next;

        match outcome {
            SampleOutcome::Malformed => {
                tracing::trace!(?sample, "dropping malformed motion sample")
            }
            SampleOutcome::Shake { delta } => {
                tracing::debug!(delta, threshold = self.config.threshold, "shake detected")
            }
            _ => {}
        }

        outcome
    }
}
