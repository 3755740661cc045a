//! Shake detection for shakeball.
//!
//! Reduces a noisy stream of 3-axis acceleration readings (gravity included)
//! to discrete "shake" events.
//!
//! # Algorithm
//!
//! - Samples with a missing or zero axis are dropped.
//! - At most one sample is accepted per `min_interval_ms` (100 ms by default),
//!   independent of the sensor's native rate.
//! - Each accepted sample is diffed against the previous accepted one; the sum
//!   of absolute per-axis deltas above `threshold` (15 by default) is a shake.
//!
//! # Example
//!
//! ```
//! use shakeball_motion::{MotionSample, ShakeClassifier};
//!
//! let mut classifier = ShakeClassifier::default();
//! assert!(!classifier.feed(&MotionSample::new(0.1, 0.1, 0.1, 0)).is_shake());
//! assert!(classifier.feed(&MotionSample::new(20.0, 0.1, 0.1, 200)).is_shake());
//! ```

mod classifier;
mod sample;

pub use classifier::{
    classify, ClassifierConfig, ClassifierState, SampleOutcome, ShakeClassifier,
    DEFAULT_MIN_INTERVAL_MS, DEFAULT_SHAKE_THRESHOLD,
};
pub use sample::{Axes, MotionSample};
