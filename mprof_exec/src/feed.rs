//! Implementations for the setpoint feed module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace};
use serde::Serialize;

// Internal
use crate::params::Params;
use mprof_lib::{PlanError, Profile, Setpoint};
use util::{
    archive::{Archived, Archiver},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Setpoint feed module state
///
/// Wraps a planned profile and plays it out cycle by cycle as the reference
/// setpoints a feedback controller would consume. All planning happens in
/// `init`, `proc` only queries the profile.
#[derive(Default)]
pub struct SetpointFeed {

    profile: Option<Profile>,

    pub(crate) report: StatusReport,
    arch_report: Archiver,

    output: Option<Setpoint>,
    arch_output: Archiver,
}

/// Input data to the setpoint feed.
#[derive(Default)]
pub struct InputData {
    /// Elapsed time since the start of the profile in seconds.
    pub elapsed_s: f64,
}

/// Status report for setpoint feed processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// True once the profile is complete.
    pub finished: bool,

    /// Seconds remaining until the profile reaches its target position.
    pub time_to_target_s: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during setpoint feed operation.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("No profile has been planned, was the feed initialised?")]
    NoProfile,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for SetpointFeed {
    type InitData = Params;
    type InitError = PlanError;

    type InputData = InputData;
    type OutputData = Setpoint;
    type StatusReport = StatusReport;
    type ProcError = FeedError;

    /// Initialise the setpoint feed.
    ///
    /// Plans the profile from the given parameters and sets up the archives.
    /// Planning is eager, a failure here means the parameters describe a
    /// degenerate problem and no playback is possible.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let profile = Profile::asym_trapezoid(
            &init_data.constraints,
            init_data.target,
            init_data.initial,
        )?;

        info!("Profile planned:");
        info!("    Phases: {}", profile.phases().len());
        info!("    Total time: {:.3} s", profile.total_time_s());
        info!("    End setpoint: {:?}", profile.end());

        // Save the planned phases so they can be plotted against the
        // archived setpoints
        session.save("profile.json", &profile);

        // Create the arch folder for the feed
        let mut arch_path = session.arch_root.clone();
        arch_path.push("setpoint_feed");
        std::fs::create_dir_all(arch_path).unwrap();

        // Initialise the archivers
        self.arch_report = Archiver::from_path(
            session, "setpoint_feed/status_report.csv"
        ).unwrap();
        self.arch_output = Archiver::from_path(
            session, "setpoint_feed/output.csv"
        ).unwrap();

        self.profile = Some(profile);

        Ok(())
    }

    /// Perform cyclic processing of the setpoint feed.
    ///
    /// Samples the profile at the given elapsed time and reports whether the
    /// profile has completed.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let profile = match self.profile {
            Some(ref p) => p,
            None => return Err(FeedError::NoProfile),
        };

        let setpoint = profile.sample(input_data.elapsed_s);

        self.report = StatusReport {
            finished: profile.is_finished(input_data.elapsed_s),
            time_to_target_s: (profile.time_until(profile.end().pos_m)
                - input_data.elapsed_s)
                .max(0.0),
        };

        trace!(
            "Setpoint feed output: pos {:.4} m, vel {:.4} m/s",
            setpoint.pos_m,
            setpoint.vel_ms
        );

        self.output = Some(setpoint);

        Ok((setpoint, self.report))
    }
}

impl Archived for SetpointFeed {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Write each one individually
        self.arch_report.serialise(self.report)?;
        self.arch_output.serialise(self.output)?;

        Ok(())
    }
}
