//! Asymmetric trapezoid phase solve
//!
//! The derivation below assumes motion in the positive direction; negative
//! displacements are handled by multiplying every signed quantity by the
//! direction of travel first. The nominal solve produces an accelerate /
//! coast / decelerate breakdown at the velocity limit. When the coast
//! displacement comes out opposing the direction of travel the limit cannot
//! be reached without overshooting the target, and the accelerate and
//! decelerate ramps must instead intersect below it. Expressing the total
//! displacement as the sum of the three ramp integrals gives a quadratic in
//! the acceleration time, solved in closed form here.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{Constraints, PlanError};
use crate::phase::ProfilePhase;
use crate::setpoint::Setpoint;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Solve the accelerate/coast/decelerate phase breakdown for the given
/// constraints and endpoints.
///
/// The constraints must have been validated by the caller. The returned
/// sequence only contains phases with strictly positive durations.
pub(super) fn calc_phases(
    constraints: &Constraints,
    target: Setpoint,
    initial: Setpoint,
) -> Result<Vec<ProfilePhase>, PlanError> {
    // ---- DIRECTION NORMALISATION ----

    // Zero displacement is treated as positive direction
    let delta_m = target.pos_m - initial.pos_m;
    let dir = if delta_m < 0.0 { -1.0 } else { 1.0 };

    let max_vel_ms = constraints.max_vel_ms * dir;
    let acc_ms2 = constraints.max_acc_ms2.abs() * dir;
    let dec_ms2 = -constraints.max_dec_ms2.abs() * dir;

    // ---- ENDPOINT VELOCITY CLAMPING ----

    // The initial velocity is allowed to point away from the target (the
    // vehicle is still moving the wrong way when the profile starts), it
    // only needs limiting in the direction of travel
    let init_vel_ms = if dir > 0.0 {
        initial.vel_ms.min(max_vel_ms)
    }
    else {
        initial.vel_ms.max(max_vel_ms)
    };
    let target_vel_ms = if dir > 0.0 {
        target.vel_ms.min(max_vel_ms)
    }
    else {
        target.vel_ms.max(max_vel_ms)
    };

    // ---- NOMINAL THREE PHASE SOLVE ----

    let mut acc_time_s = (max_vel_ms - init_vel_ms) / acc_ms2;
    let mut acc_disp_m = init_vel_ms * acc_time_s + 0.5 * acc_ms2 * acc_time_s.powi(2);

    let mut dec_time_s = (target_vel_ms - max_vel_ms) / dec_ms2;
    let mut dec_disp_m = max_vel_ms * dec_time_s + 0.5 * dec_ms2 * dec_time_s.powi(2);

    let mut coast_disp_m = delta_m - (acc_disp_m + dec_disp_m);
    let mut coast_time_s = coast_disp_m / max_vel_ms;

    // Deceleration actually applied in the final phase. Recomputed in the
    // unreachable-target-velocity case below, where the constraint limit
    // cannot land on the target exactly.
    let mut dec_eff_ms2 = dec_ms2;

    // ---- INFEASIBLE COAST ----

    // A coast displacement opposing the direction of travel means the
    // velocity limit cannot be reached without overshooting the target, so
    // the ramps intersect below the limit instead
    if coast_disp_m * dir < 0.0 {
        let delta_vel_ms = init_vel_ms - target_vel_ms;

        // Quadratic in the acceleration time, from summing the accelerate
        // ramp, its mirrored deceleration back to the initial velocity, and
        // the deceleration on to the target velocity
        let qa = 0.5 * acc_ms2 - acc_ms2.powi(2) / (2.0 * dec_ms2);
        let qb = init_vel_ms - init_vel_ms * acc_ms2 / dec_ms2;
        let qc = -(delta_vel_ms.powi(2) / (2.0 * dec_ms2)
            + target_vel_ms * delta_vel_ms / dec_ms2
            + delta_m);

        let disc = qb.powi(2) - 4.0 * qa * qc;
        if disc < 0.0 {
            return Err(PlanError::NoRampIntersection { initial, target });
        }

        // This root choice is the one which is non-negative for any feasible
        // set of endpoints
        acc_time_s = (-qb + dir * disc.sqrt()) / (2.0 * qa);
        dec_time_s = -(acc_ms2 / dec_ms2 * acc_time_s + delta_vel_ms / dec_ms2);

        if dec_time_s < 0.0 {
            // The target velocity is unreachable from below: accelerate flat
            // out across the whole remaining displacement
            dec_time_s = 0.0;
            dec_disp_m = 0.0;

            acc_disp_m = delta_m;
            acc_time_s = (-init_vel_ms
                + (init_vel_ms.powi(2) + 2.0 * acc_ms2 * delta_m).sqrt())
                / acc_ms2;
        }
        else if acc_time_s < 0.0 {
            // The target velocity is unreachable from above: decelerate
            // across the whole remaining displacement at the rate which
            // lands exactly on the target
            acc_time_s = 0.0;
            acc_disp_m = 0.0;

            dec_disp_m = delta_m;
            dec_time_s = 2.0 * dec_disp_m / (init_vel_ms + target_vel_ms);
            dec_eff_ms2 = (target_vel_ms - init_vel_ms) / dec_time_s;
        }
        else {
            acc_disp_m = init_vel_ms * acc_time_s + 0.5 * acc_ms2 * acc_time_s.powi(2);

            let peak_vel_ms = init_vel_ms + acc_ms2 * acc_time_s;
            dec_disp_m = peak_vel_ms * dec_time_s + 0.5 * dec_ms2 * dec_time_s.powi(2);
        }

        coast_time_s = 0.0;
        coast_disp_m = 0.0;
    }

    // ---- SANITY ----

    // Any residual division blow-up surfaces as an error here rather than as
    // NaN phases at sample time
    let quantities = [
        acc_time_s,
        acc_disp_m,
        coast_time_s,
        coast_disp_m,
        dec_time_s,
        dec_disp_m,
        dec_eff_ms2,
    ];
    if quantities.iter().any(|q| !q.is_finite()) {
        return Err(PlanError::NoRampIntersection { initial, target });
    }

    // ---- PHASE ASSEMBLY ----

    // Only phases with strictly positive durations are kept, zero length
    // phases would corrupt the sampling walk
    let dec_init_vel_ms = init_vel_ms + acc_ms2 * acc_time_s;

    let mut phases = Vec::with_capacity(3);

    if acc_time_s > 0.0 {
        phases.push(ProfilePhase::new(acc_time_s, acc_disp_m, acc_ms2, init_vel_ms));
    }
    if coast_time_s > 0.0 {
        phases.push(ProfilePhase::new(coast_time_s, coast_disp_m, 0.0, max_vel_ms));
    }
    if dec_time_s > 0.0 {
        phases.push(ProfilePhase::new(
            dec_time_s,
            dec_disp_m,
            dec_eff_ms2,
            dec_init_vel_ms,
        ));
    }

    Ok(phases)
}
