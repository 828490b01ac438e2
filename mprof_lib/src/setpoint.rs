//! Setpoint definition

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

/// A reference state along a motion profile.
///
/// A setpoint is either an endpoint of a profile (the initial or target
/// state) or a point sampled part way along it, in which case it is the
/// reference fed to a feedback controller for that control cycle.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Setpoint {
    /// Position in meters.
    pub pos_m: f64,

    /// Velocity in meters/second.
    pub vel_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Setpoint {
    pub fn new(pos_m: f64, vel_ms: f64) -> Self {
        Self { pos_m, vel_ms }
    }

    /// True if both components are finite (not NaN and not infinite).
    pub fn is_finite(&self) -> bool {
        self.pos_m.is_finite() && self.vel_ms.is_finite()
    }
}

impl PartialEq for Setpoint {
    /// Setpoints are compared within [`APPROX_EPSILON`] on both components,
    /// as they are recomputed from floating point arithmetic and carry
    /// rounding noise.
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.pos_m, other.pos_m, APPROX_EPSILON)
            && approx_eq(self.vel_ms, other.vel_ms, APPROX_EPSILON)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_approx_equality() {
        let sp = Setpoint::new(1.0, -0.5);

        assert_eq!(sp, Setpoint::new(1.0 + 0.5e-4, -0.5 - 0.5e-4));
        assert_ne!(sp, Setpoint::new(1.001, -0.5));
        assert_ne!(sp, Setpoint::new(1.0, -0.501));
    }

    #[test]
    fn test_is_finite() {
        assert!(Setpoint::new(0.0, 0.0).is_finite());
        assert!(!Setpoint::new(std::f64::NAN, 0.0).is_finite());
        assert!(!Setpoint::new(0.0, std::f64::INFINITY).is_finite());
    }
}
