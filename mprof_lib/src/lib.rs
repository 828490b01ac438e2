//! # Motion profile library
//!
//! This library generates constrained motion profiles: given a start setpoint
//! (position and velocity), a goal setpoint, and kinematic limits (maximum
//! velocity, acceleration and deceleration, possibly asymmetric) it produces
//! a deterministic, closed-form, piecewise-quadratic trajectory. A feedback
//! controller samples the trajectory at any elapsed time to obtain the
//! reference position and velocity for that control cycle.
//!
//! Planning happens eagerly when a profile is constructed, sampling is a pure
//! read-only query, so a planned profile may be shared and sampled from
//! multiple threads without locking.
//!
//! This library performs no I/O, no logging and no timing of its own, the
//! caller supplies the elapsed time on each query.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// A single constant-acceleration interval of a profile.
pub mod phase;

/// The trapezoid planners which build profiles from constraints and endpoints.
pub mod planner;

/// The profile itself and its sampling queries.
pub mod profile;

/// The position/velocity pair fed to a feedback controller.
pub mod setpoint;

// ---------------------------------------------------------------------------
// REEXPORTS
// ---------------------------------------------------------------------------

pub use phase::ProfilePhase;
pub use planner::{Constraints, PlanError};
pub use profile::Profile;
pub use setpoint::Setpoint;
