//! # Motion profile planners
//!
//! The planners here turn kinematic constraints and a pair of endpoint
//! setpoints into a [`Profile`] of at most three constant-acceleration
//! phases: accelerate, coast, decelerate. All planning happens eagerly at
//! construction, the returned profile is then sampled cycle by cycle through
//! [`Profile::sample`].
//!
//! The asymmetric planner is the algorithmic core. It handles the degenerate
//! cases where coasting at the velocity limit is infeasible (the accelerate
//! and decelerate ramps must intersect below the limit) and where the target
//! velocity is not kinematically reachable at the target position. The
//! symmetric planner delegates to it with equal acceleration and
//! deceleration magnitudes.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_asym;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::profile::Profile;
use crate::setpoint::Setpoint;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic limits a planned profile must respect.
///
/// All limits are magnitudes, the planners apply signs internally based on
/// the direction of travel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Constraints {
    /// Maximum velocity magnitude in meters/second.
    pub max_vel_ms: f64,

    /// Maximum acceleration magnitude in meters/second^2.
    pub max_acc_ms2: f64,

    /// Maximum deceleration magnitude in meters/second^2.
    pub max_dec_ms2: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while planning a profile.
///
/// Planning either succeeds with a fully determined profile or fails here,
/// at construction. The sampling queries on a planned profile cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Zero or negative magnitudes would divide by zero in the phase solve,
    /// so they are rejected up front.
    #[error("Constraint magnitudes must be strictly positive and finite: {0:?}")]
    InvalidConstraints(Constraints),

    #[error("Endpoint setpoints must be finite: initial {0:?}, target {1:?}")]
    NonFiniteEndpoint(Setpoint, Setpoint),

    #[error("A zero displacement profile cannot end with a non-zero target velocity ({0} m/s)")]
    MovingTargetAtZeroDisplacement(f64),

    /// The accelerate and decelerate ramps have no real intersection for the
    /// requested endpoints.
    #[error("No ramp intersection exists for initial {initial:?} and target {target:?}")]
    NoRampIntersection { initial: Setpoint, target: Setpoint },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Constraints {
    pub fn new(max_vel_ms: f64, max_acc_ms2: f64, max_dec_ms2: f64) -> Self {
        Self {
            max_vel_ms,
            max_acc_ms2,
            max_dec_ms2,
        }
    }

    /// Constraints with equal acceleration and deceleration magnitudes.
    pub fn symmetric(max_vel_ms: f64, max_acc_ms2: f64) -> Self {
        Self::new(max_vel_ms, max_acc_ms2, max_acc_ms2)
    }

    /// True if all magnitudes are strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.max_vel_ms > 0.0
            && self.max_vel_ms.is_finite()
            && self.max_acc_ms2 > 0.0
            && self.max_acc_ms2.is_finite()
            && self.max_dec_ms2 > 0.0
            && self.max_dec_ms2.is_finite()
    }
}

impl Profile {
    /// Plan a profile with independent acceleration and deceleration limits.
    ///
    /// The planned profile reaches the target position exactly (up to
    /// floating point error) and the target velocity whenever that velocity
    /// is reachable under the constraints. When it is not reachable the
    /// profile instead ends at the best achievable velocity for that exact
    /// position.
    ///
    /// The initial velocity may point away from the target (the vehicle is
    /// still moving the wrong way when the profile starts); the target
    /// velocity is assumed to be direction consistent.
    pub fn asym_trapezoid(
        constraints: &Constraints,
        target: Setpoint,
        initial: Setpoint,
    ) -> Result<Profile, PlanError> {
        // Validate the inputs before any arithmetic so that degenerate
        // values surface as errors rather than NaN phases
        if !constraints.is_valid() {
            return Err(PlanError::InvalidConstraints(*constraints));
        }

        if !initial.is_finite() || !target.is_finite() {
            return Err(PlanError::NonFiniteEndpoint(initial, target));
        }

        if target.pos_m == initial.pos_m && target.vel_ms != 0.0 {
            return Err(PlanError::MovingTargetAtZeroDisplacement(target.vel_ms));
        }

        let phases = calc_asym::calc_phases(constraints, target, initial)?;

        Ok(Profile::from_phases(initial, phases))
    }

    /// Plan a profile with equal acceleration and deceleration magnitudes.
    pub fn trapezoid(
        max_vel_ms: f64,
        max_acc_ms2: f64,
        target: Setpoint,
        initial: Setpoint,
    ) -> Result<Profile, PlanError> {
        Self::asym_trapezoid(
            &Constraints::symmetric(max_vel_ms, max_acc_ms2),
            target,
            initial,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use util::maths::approx_eq;

    #[test]
    fn test_full_trapezoid() {
        let profile = Profile::asym_trapezoid(
            &Constraints::new(1.0, 1.0, 1.0),
            Setpoint::new(4.0, 0.0),
            Setpoint::default(),
        )
        .unwrap();

        // Accelerate, coast, decelerate
        let phases = profile.phases();
        assert_eq!(phases.len(), 3);
        assert!(phases[0].acc_ms2 > 0.0);
        assert_eq!(phases[1].acc_ms2, 0.0);
        assert!(phases[2].acc_ms2 < 0.0);

        assert!(profile.total_time_s() > 0.0);
        assert_eq!(profile.sample(profile.total_time_s()), Setpoint::new(4.0, 0.0));
    }

    #[test]
    fn test_triangle_no_coast() {
        // The velocity limit is unreachable before deceleration must begin,
        // so the ramps intersect below it and no coast phase appears
        let profile = Profile::asym_trapezoid(
            &Constraints::new(10.0, 1.0, 1.0),
            Setpoint::new(4.0, 0.0),
            Setpoint::default(),
        )
        .unwrap();

        let phases = profile.phases();
        assert_eq!(phases.len(), 2);
        assert!(phases.iter().all(|p| p.acc_ms2 != 0.0));

        // The ramp intersection solve reproduces the target exactly
        assert_eq!(profile.total_time_s(), 4.0);
        assert_eq!(profile.end(), Setpoint::new(4.0, 0.0));

        // Peak velocity is at the ramp intersection, below the limit
        assert!(approx_eq(phases[0].end_vel_ms(), 2.0, 1e-9));
    }

    #[test]
    fn test_symmetric_matches_asym() {
        let target = Setpoint::new(4.0, 0.0);
        let initial = Setpoint::new(-1.0, 0.25);

        let sym = Profile::trapezoid(1.0, 0.5, target, initial).unwrap();
        let asym = Profile::asym_trapezoid(
            &Constraints::new(1.0, 0.5, 0.5),
            target,
            initial,
        )
        .unwrap();

        assert_eq!(sym.phases(), asym.phases());
        assert_eq!(sym.total_time_s(), asym.total_time_s());
    }

    #[test]
    fn test_negative_direction_mirrors_positive() {
        let constraints = Constraints::new(1.0, 1.0, 0.5);

        let fwd = Profile::asym_trapezoid(
            &constraints,
            Setpoint::new(4.0, 0.0),
            Setpoint::default(),
        )
        .unwrap();
        let rev = Profile::asym_trapezoid(
            &constraints,
            Setpoint::new(-4.0, 0.0),
            Setpoint::default(),
        )
        .unwrap();

        assert_eq!(fwd.phases().len(), rev.phases().len());
        assert_eq!(fwd.total_time_s(), rev.total_time_s());

        for (f, r) in fwd.phases().iter().zip(rev.phases()) {
            assert_eq!(f.duration_s, r.duration_s);
            assert!(approx_eq(f.disp_m, -r.disp_m, 1e-9));
            assert!(approx_eq(f.acc_ms2, -r.acc_ms2, 1e-9));
        }

        assert_eq!(rev.end(), Setpoint::new(-4.0, 0.0));
    }

    #[test]
    fn test_wrong_way_initial_velocity() {
        // Moving away from the target at 1 m/s when the profile starts: the
        // acceleration phase first brings the vehicle to a stop, then back up
        // to the velocity limit
        let profile = Profile::asym_trapezoid(
            &Constraints::new(1.0, 1.0, 1.0),
            Setpoint::new(4.0, 0.0),
            Setpoint::new(0.0, -1.0),
        )
        .unwrap();

        assert_eq!(profile.total_time_s(), 6.5);
        assert_eq!(profile.end(), Setpoint::new(4.0, 0.0));
    }

    #[test]
    fn test_target_velocity_unreachable_high() {
        // 10 m/s cannot be reached within 2 m at 1 m/s^2: the profile
        // accelerates flat out across the whole displacement instead
        let profile = Profile::asym_trapezoid(
            &Constraints::new(10.0, 1.0, 1.0),
            Setpoint::new(2.0, 10.0),
            Setpoint::default(),
        )
        .unwrap();

        let phases = profile.phases();
        assert_eq!(phases.len(), 1);
        assert!(phases[0].acc_ms2 > 0.0);

        let end = profile.end();
        assert_eq!(end.pos_m, 2.0);
        assert!(approx_eq(end.vel_ms, 2.0, 1e-9));
    }

    #[test]
    fn test_target_velocity_unreachable_low() {
        // Already moving too fast to stop within 2 m at the deceleration
        // limit: the profile decelerates across the whole displacement at the
        // recomputed rate which lands exactly on the target
        let profile = Profile::asym_trapezoid(
            &Constraints::new(10.0, 1.0, 1.0),
            Setpoint::new(2.0, 0.0),
            Setpoint::new(0.0, 5.0),
        )
        .unwrap();

        let phases = profile.phases();
        assert_eq!(phases.len(), 1);
        assert!(approx_eq(phases[0].duration_s, 0.8, 1e-9));
        assert!(approx_eq(phases[0].acc_ms2, -6.25, 1e-9));

        assert_eq!(profile.end(), Setpoint::new(2.0, 0.0));
    }

    #[test]
    fn test_initial_velocity_clamped() {
        // An initial velocity above the limit is clamped before planning
        let profile = Profile::asym_trapezoid(
            &Constraints::new(1.0, 1.0, 1.0),
            Setpoint::new(4.0, 0.0),
            Setpoint::new(0.0, 3.0),
        )
        .unwrap();

        // No acceleration phase: the walk starts at the velocity limit
        assert!(approx_eq(profile.phases()[0].init_vel_ms, 1.0, 1e-9));
        assert_eq!(profile.end(), Setpoint::new(4.0, 0.0));
    }

    #[test]
    fn test_zero_displacement_at_rest() {
        let profile = Profile::asym_trapezoid(
            &Constraints::new(1.0, 1.0, 1.0),
            Setpoint::new(2.0, 0.0),
            Setpoint::new(2.0, 0.0),
        )
        .unwrap();

        assert_eq!(profile.phases().len(), 0);
        assert_eq!(profile.total_time_s(), 0.0);
        assert_eq!(profile.sample(1.0), Setpoint::new(2.0, 0.0));
    }

    #[test]
    fn test_invalid_constraints_rejected() {
        let target = Setpoint::new(4.0, 0.0);
        let initial = Setpoint::default();

        for constraints in &[
            Constraints::new(0.0, 1.0, 1.0),
            Constraints::new(1.0, 0.0, 1.0),
            Constraints::new(1.0, 1.0, 0.0),
            Constraints::new(-1.0, 1.0, 1.0),
            Constraints::new(1.0, std::f64::NAN, 1.0),
            Constraints::new(1.0, 1.0, std::f64::INFINITY),
        ] {
            match Profile::asym_trapezoid(constraints, target, initial) {
                Err(PlanError::InvalidConstraints(_)) => (),
                other => panic!("Expected InvalidConstraints, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_non_finite_endpoints_rejected() {
        let constraints = Constraints::new(1.0, 1.0, 1.0);

        match Profile::asym_trapezoid(
            &constraints,
            Setpoint::new(std::f64::NAN, 0.0),
            Setpoint::default(),
        ) {
            Err(PlanError::NonFiniteEndpoint(_, _)) => (),
            other => panic!("Expected NonFiniteEndpoint, got {:?}", other),
        }
    }

    #[test]
    fn test_moving_target_at_zero_displacement_rejected() {
        match Profile::asym_trapezoid(
            &Constraints::new(1.0, 1.0, 1.0),
            Setpoint::new(2.0, 1.0),
            Setpoint::new(2.0, 0.0),
        ) {
            Err(PlanError::MovingTargetAtZeroDisplacement(_)) => (),
            other => panic!("Expected MovingTargetAtZeroDisplacement, got {:?}", other),
        }
    }

    #[test]
    fn test_planned_phases_consistent() {
        // Every planner-produced phase satisfies the kinematic relation
        // between displacement, duration, acceleration and initial velocity
        let cases = vec![
            (Constraints::new(1.0, 1.0, 1.0), Setpoint::new(4.0, 0.0), Setpoint::default()),
            (Constraints::new(10.0, 1.0, 1.0), Setpoint::new(4.0, 0.0), Setpoint::default()),
            (Constraints::new(1.0, 0.5, 2.0), Setpoint::new(-3.0, 0.0), Setpoint::new(1.0, 0.0)),
            (Constraints::new(2.0, 1.0, 1.0), Setpoint::new(5.0, 0.5), Setpoint::new(0.0, -0.5)),
            (Constraints::new(10.0, 1.0, 1.0), Setpoint::new(2.0, 10.0), Setpoint::default()),
        ];

        for (constraints, target, initial) in cases {
            let profile = Profile::asym_trapezoid(&constraints, target, initial).unwrap();

            for phase in profile.phases() {
                assert!(phase.is_consistent());
                assert!(phase.duration_s > 0.0);
            }

            // Endpoint reproduction
            assert_eq!(profile.sample(0.0), initial);
            assert!(approx_eq(profile.end().pos_m, target.pos_m, 1e-9));
        }
    }

    #[test]
    fn test_asymmetric_limits_shape() {
        // A slower deceleration limit stretches the deceleration ramp
        let profile = Profile::asym_trapezoid(
            &Constraints::new(1.0, 2.0, 0.5),
            Setpoint::new(6.0, 0.0),
            Setpoint::default(),
        )
        .unwrap();

        let phases = profile.phases();
        assert_eq!(phases.len(), 3);
        assert!(phases[2].duration_s > phases[0].duration_s);
        assert_eq!(profile.end(), Setpoint::new(6.0, 0.0));
    }
}
