//! Parameters for the motion profile executable

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use mprof_lib::{Constraints, Setpoint};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the profile playback executable.
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Control cycle period in seconds. The profile is sampled once per
    /// cycle.
    pub cycle_period_s: f64,

    /// Kinematic limits the planned profile must respect.
    pub constraints: Constraints,

    /// The setpoint the profile starts from.
    pub initial: Setpoint,

    /// The setpoint the profile must reach.
    pub target: Setpoint,
}
