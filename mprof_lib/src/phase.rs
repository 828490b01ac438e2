//! Profile phase definition

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use util::maths::{approx_eq, APPROX_EPSILON};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One constant-acceleration interval of a motion profile.
///
/// Phases are created by the planners during profile construction and are
/// never modified afterwards. The displacement is tied to the other fields
/// by `disp = v0 * t + a * t^2 / 2`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ProfilePhase {
    /// Duration of the phase in seconds. Always non-negative.
    pub duration_s: f64,

    /// Net change in position over the phase in meters.
    pub disp_m: f64,

    /// Acceleration held over the phase in meters/second^2. Zero denotes a
    /// constant velocity coast phase.
    pub acc_ms2: f64,

    /// Velocity at the start of the phase in meters/second.
    pub init_vel_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProfilePhase {
    pub fn new(duration_s: f64, disp_m: f64, acc_ms2: f64, init_vel_ms: f64) -> Self {
        Self {
            duration_s,
            disp_m,
            acc_ms2,
            init_vel_ms,
        }
    }

    /// Build a phase from its motion alone, deriving the displacement from
    /// the duration, acceleration and initial velocity.
    pub fn from_motion(duration_s: f64, acc_ms2: f64, init_vel_ms: f64) -> Self {
        Self {
            duration_s,
            disp_m: init_vel_ms * duration_s + 0.5 * acc_ms2 * duration_s.powi(2),
            acc_ms2,
            init_vel_ms,
        }
    }

    /// Velocity at the end of the phase in meters/second.
    pub fn end_vel_ms(&self) -> f64 {
        self.init_vel_ms + self.acc_ms2 * self.duration_s
    }

    /// True if the stored displacement matches the one implied by the
    /// duration, acceleration and initial velocity, within [`APPROX_EPSILON`].
    pub fn is_consistent(&self) -> bool {
        approx_eq(
            self.disp_m,
            self.init_vel_ms * self.duration_s + 0.5 * self.acc_ms2 * self.duration_s.powi(2),
            APPROX_EPSILON,
        )
    }
}

impl PartialEq for ProfilePhase {
    /// Durations are compared exactly, the remaining fields within
    /// [`APPROX_EPSILON`].
    fn eq(&self, other: &Self) -> bool {
        self.duration_s == other.duration_s
            && approx_eq(self.disp_m, other.disp_m, APPROX_EPSILON)
            && approx_eq(self.acc_ms2, other.acc_ms2, APPROX_EPSILON)
            && approx_eq(self.init_vel_ms, other.init_vel_ms, APPROX_EPSILON)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_motion() {
        // Pure acceleration from rest
        let phase = ProfilePhase::from_motion(5.0, 1.0, 0.0);

        assert_eq!(phase.disp_m, 12.5);
        assert_eq!(phase.end_vel_ms(), 5.0);
        assert!(phase.is_consistent());

        // Coast phase
        let phase = ProfilePhase::from_motion(3.0, 0.0, 2.0);

        assert_eq!(phase.disp_m, 6.0);
        assert_eq!(phase.end_vel_ms(), 2.0);
        assert!(phase.is_consistent());
    }

    #[test]
    fn test_consistency_check() {
        assert!(ProfilePhase::new(2.0, 40.0, 10.0, 10.0).is_consistent());
        assert!(!ProfilePhase::new(2.0, 41.0, 10.0, 10.0).is_consistent());
    }

    #[test]
    fn test_approx_equality() {
        let phase = ProfilePhase::new(1.0, 0.5, 1.0, 0.0);

        // Small perturbations of the non-duration fields are tolerated
        assert_eq!(phase, ProfilePhase::new(1.0, 0.5 + 0.5e-4, 1.0 - 0.5e-4, 0.0));

        // The duration is compared exactly
        assert_ne!(phase, ProfilePhase::new(1.0 + 0.5e-4, 0.5, 1.0, 0.0));

        // Larger field differences are not tolerated
        assert_ne!(phase, ProfilePhase::new(1.0, 0.51, 1.0, 0.0));
    }
}
