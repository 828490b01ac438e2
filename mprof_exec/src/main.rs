//! # Motion Profile Executable
//!
//! This executable demonstrates the motion profile library by planning a
//! profile from a parameter file and playing it back through a simulated
//! control cycle. Each cycle samples the profile at the current elapsed time
//! and archives the setpoint a feedback controller would receive on that
//! cycle. The cycle time is stepped synthetically, the profile itself is
//! free of any timing.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Setpoint feed wrapping the planned profile.
mod feed;

/// Parameters for the executable.
mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{eyre::eyre, eyre::WrapErr, Result};
use log::{info, warn};
use structopt::StructOpt;

// Internal
use feed::{InputData, SetpointFeed};
use params::Params;
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Command line options for the executable.
#[derive(StructOpt)]
#[structopt(name = "mprof_exec", about = "Motion profile playback")]
struct Opts {
    /// Name of the parameter file to load, relative to the params directory.
    #[structopt(default_value = "mprof_exec.toml")]
    params_file: String,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "mprof_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Motion Profile Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let params: Params = util::params::load(&opts.params_file)?;

    if params.cycle_period_s <= 0.0 {
        return Err(eyre!(
            "The cycle period must be strictly positive, got {} s",
            params.cycle_period_s
        ));
    }

    info!("Parameters loaded");

    // ---- PLANNING ----

    let mut feed = SetpointFeed::default();
    feed.init(params.clone(), &session)
        .wrap_err("Failed to plan the profile")?;

    // ---- PLAYBACK LOOP ----

    info!("Initialisation complete, starting playback");

    let mut elapsed_s = 0.0;

    loop {
        let (setpoint, report) = feed.proc(&InputData { elapsed_s })
            .wrap_err("Setpoint feed processing failed")?;

        // Archive this cycle's data
        if let Err(e) = feed.write() {
            warn!("Could not write archives: {}", e);
        }

        if report.finished {
            info!(
                "Profile complete after {:.3} s at pos {:.4} m, vel {:.4} m/s",
                elapsed_s, setpoint.pos_m, setpoint.vel_ms
            );
            break;
        }

        elapsed_s += params.cycle_period_s;
    }

    Ok(())
}
