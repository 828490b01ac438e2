//! Motion profile storage and sampling
//!
//! A profile is an ordered sequence of constant-acceleration phases plus the
//! setpoint the profile starts from. Profiles are built once, eagerly, by the
//! planners in [`crate::planner`] and are read-only for the rest of their
//! lifetime. All queries here are pure and complete in time proportional to
//! the number of phases (at most three for planned profiles).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::phase::ProfilePhase;
use crate::setpoint::Setpoint;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A piecewise-quadratic motion profile.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    /// The phases in chronological order. Zero duration phases are never
    /// stored.
    phases: Vec<ProfilePhase>,

    /// The setpoint at `t = 0`.
    initial: Setpoint,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Profile {
    /// Build a profile from an initial setpoint and a phase sequence.
    ///
    /// Phases without a strictly positive duration are discarded, which keeps
    /// the sampling walk well defined.
    pub fn from_phases(initial: Setpoint, phases: Vec<ProfilePhase>) -> Self {
        Self {
            phases: phases.into_iter().filter(|p| p.duration_s > 0.0).collect(),
            initial,
        }
    }

    /// The setpoint the profile starts from.
    pub fn initial(&self) -> Setpoint {
        self.initial
    }

    /// The phases of the profile in chronological order.
    pub fn phases(&self) -> &[ProfilePhase] {
        &self.phases
    }

    /// Total duration of the profile in seconds.
    pub fn total_time_s(&self) -> f64 {
        self.phases.iter().map(|p| p.duration_s).sum()
    }

    /// True once the given elapsed time has reached the end of the profile.
    pub fn is_finished(&self, time_s: f64) -> bool {
        time_s >= self.total_time_s()
    }

    /// The setpoint held once the profile has completed.
    pub fn end(&self) -> Setpoint {
        self.sample(self.total_time_s())
    }

    /// Sample the reference setpoint at the given elapsed time.
    ///
    /// Times at or before zero return the initial setpoint unchanged. Times
    /// beyond the end of the profile return the final accumulated position
    /// together with the final phase's end velocity, which is the target's
    /// velocity whenever the planner found it reachable, so a controller
    /// holding the last setpoint sees no velocity step.
    pub fn sample(&self, time_s: f64) -> Setpoint {
        if time_s <= 0.0 {
            return self.initial;
        }

        let mut t_s = time_s;
        let mut pos_m = self.initial.pos_m;

        // Walk the phases until the one containing the requested time is
        // found, accumulating the position of each completed phase.
        for phase in &self.phases {
            if t_s < phase.duration_s {
                return Setpoint {
                    pos_m: pos_m
                        + phase.init_vel_ms * t_s
                        + 0.5 * phase.acc_ms2 * t_s.powi(2),
                    vel_ms: phase.init_vel_ms + phase.acc_ms2 * t_s,
                };
            }

            t_s -= phase.duration_s;
            pos_m += phase.disp_m;
        }

        // The requested time is beyond the final phase
        Setpoint {
            pos_m,
            vel_ms: match self.phases.last() {
                Some(p) => p.end_vel_ms(),
                None => self.initial.vel_ms,
            },
        }
    }

    /// Elapsed time at which the profile first reaches the given position.
    ///
    /// The walk here steps by displacement rather than by time, inverting the
    /// kinematics of the phase the queried position falls in. Queries behind
    /// the start (relative to the direction of travel) saturate to zero, and
    /// queries beyond the final position saturate to the total time.
    pub fn time_until(&self, pos_m: f64) -> f64 {
        let dir = self.direction();

        let mut remaining_m = pos_m - self.initial.pos_m;
        let mut elapsed_s = 0.0;

        // Behind (or exactly at) the start
        if remaining_m * dir <= 0.0 {
            return 0.0;
        }

        for phase in &self.phases {
            // Step over phases the queried position lies beyond
            if remaining_m * dir > phase.disp_m * dir {
                remaining_m -= phase.disp_m;
                elapsed_s += phase.duration_s;
                continue;
            }

            // The position falls within this phase, invert its kinematics
            let t_s = if phase.acc_ms2 == 0.0 {
                remaining_m / phase.init_vel_ms
            } else {
                let v0 = phase.init_vel_ms;
                let disc =
                    (v0.powi(2) + 2.0 * phase.acc_ms2 * remaining_m).max(0.0);

                (-v0 + dir * disc.sqrt()) / phase.acc_ms2
            };

            return elapsed_s + clamp(&t_s, &0.0, &phase.duration_s);
        }

        // Beyond the final position
        self.total_time_s()
    }

    /// The direction of travel: `-1.0` for profiles with net negative
    /// displacement, `+1.0` otherwise.
    fn direction(&self) -> f64 {
        let disp_m: f64 = self.phases.iter().map(|p| p.disp_m).sum();

        if disp_m < 0.0 {
            -1.0
        }
        else {
            1.0
        }
    }
}
