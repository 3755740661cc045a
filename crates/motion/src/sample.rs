//! Raw accelerometer readings.

use serde::{Deserialize, Serialize};

/// One reading of acceleration including gravity, as delivered by the sensor.
///
/// Axes are optional because platforms may deliver a motion event without
/// acceleration data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    /// Capture time in milliseconds.
    pub ts_ms: i64,
}

impl MotionSample {
    /// Create a sample with all three axes present.
    pub fn new(x: f64, y: f64, z: f64, ts_ms: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            ts_ms,
        }
    }

    /// A motion event that carried no acceleration data.
    pub fn empty(ts_ms: i64) -> Self {
        Self {
            x: None,
            y: None,
            z: None,
            ts_ms,
        }
    }

    /// Returns the three axes if every one holds a usable reading.
    ///
    /// A reading of exactly `0.0` counts as missing: platforms report absent
    /// data as zero often enough that the two cannot be told apart. NaN and
    /// infinite readings are missing too.
    pub fn axes(&self) -> Option<Axes> {
        let usable = |v: Option<f64>| v.filter(|v| v.is_finite() && *v != 0.0);
        Some(Axes {
            x: usable(self.x)?,
            y: usable(self.y)?,
            z: usable(self.z)?,
        })
    }
}

/// A complete 3-axis reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Axes {
    /// Sum of absolute per-axis differences.
    pub fn delta(&self, previous: &Axes) -> f64 {
        (self.x - previous.x).abs() + (self.y - previous.y).abs() + (self.z - previous.z).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_complete() {
        let sample = MotionSample::new(1.0, -2.0, 9.8, 0);
        assert_eq!(
            sample.axes(),
            Some(Axes {
                x: 1.0,
                y: -2.0,
                z: 9.8
            })
        );
    }

    #[test]
    fn test_axes_missing() {
        let sample = MotionSample {
            z: None,
            ..MotionSample::new(1.0, 1.0, 1.0, 0)
        };
        assert_eq!(sample.axes(), None);
        assert_eq!(MotionSample::empty(0).axes(), None);
    }

    #[test]
    fn test_zero_axis_counts_as_missing() {
        assert_eq!(MotionSample::new(0.0, 1.0, 1.0, 0).axes(), None);
        assert_eq!(MotionSample::new(1.0, 1.0, 0.0, 0).axes(), None);
    }

    #[test]
    fn test_non_finite_axis_counts_as_missing() {
        assert_eq!(MotionSample::new(f64::NAN, 1.0, 1.0, 0).axes(), None);
        assert_eq!(MotionSample::new(1.0, f64::INFINITY, 1.0, 0).axes(), None);
        assert_eq!(MotionSample::new(1.0, 1.0, f64::NEG_INFINITY, 0).axes(), None);
    }

    #[test]
    fn test_delta_is_orientation_agnostic() {
        let a = Axes {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        let b = Axes {
            x: -1.0,
            y: 5.0,
            z: 3.0,
        };
        assert_eq!(a.delta(&b), 5.0);
        assert_eq!(b.delta(&a), 5.0);
    }

    #[test]
    fn test_sample_deserialize_with_null_axis() {
        let json = r#"{"x": 1.5, "y": null, "z": 9.8, "ts_ms": 42}"#;
        let sample: MotionSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.y, None);
        assert_eq!(sample.ts_ms, 42);
        assert!(sample.axes().is_none());
    }
}
