//! Main vehicle-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Vehicle state acquisition (simulation in development builds)
//!         - Stop manager processing
//!         - Longitudinal control processing
//!         - Archiving and telemetry
//!         - Cycle management
//!
//! # Modules
//!
//! All modules (e.g. `stop_mgr`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State`
//!        trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use veh_lib::{
    data_store::DataStore,
    long_ctrl, stop_mgr,
    params::ExecParams,
    tm_client::TmClient,
};

#[cfg(feature = "sim")]
use veh_lib::sim::VehSim;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{error, info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
    time::RateTimer,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "veh_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution
    info!("Shuttle Vehicle Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams = util::params::load(
        "veh_exec.toml"
    ).wrap_err("Could not load exec params")?;

    session.save("veh_exec_params.json", exec_params.clone());

    info!("Exec parameters loaded");

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    // A stop manager init failure is not fatal: this is a driver-assistance
    // feature, so the exec keeps cycling with the module disabled (asserting
    // nothing) rather than aborting.
    let stop_mgr_enabled = match ds.stop_mgr.init("stop_mgr.toml", &session) {
        Ok(()) => {
            info!("StopMgr init complete");
            true
        }
        Err(e) => {
            error!("StopMgr init failed, continuing with the module disabled: {}", e);
            false
        }
    };

    ds.long_ctrl.init("long_ctrl.toml", &session)
        .wrap_err("Failed to initialise LongCtrl")?;
    info!("LongCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE TELEMETRY ----

    let tm_client = TmClient::new(exec_params.tm_endpoint.as_deref());
    let mut tm_timer = RateTimer::new(exec_params.tm_period_s, Instant::now());

    // ---- INITIALISE VEHICLE STATE SOURCE ----

    #[cfg(feature = "sim")]
    let mut veh_sim = VehSim::new(exec_params.sim);
    #[cfg(feature = "sim")]
    info!("Simulated vehicle-state source initialised");

    #[cfg(not(feature = "sim"))]
    warn!("No vehicle-state source available in this build, outputs disabled");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- DATA INPUT ----

        // Step the simulation with the previous cycle's demand and take its
        // snapshot
        #[cfg(feature = "sim")]
        {
            veh_sim.step(
                CYCLE_PERIOD_S,
                ds.long_ctrl_output.accel_dem_ms2,
                ds.stop_mgr.current_target(),
            );
            ds.veh_state = Some(veh_sim.state());
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        if let Some(veh_state) = ds.veh_state {
            let now = Instant::now();

            // StopMgr processing
            if stop_mgr_enabled {
                let input = stop_mgr::InputData { veh_state, now };

                match ds.stop_mgr.proc(&input) {
                    Ok((output, report)) => {
                        ds.stop_mgr_output = output;
                        ds.stop_mgr_report = report;
                    }
                    Err(e) => warn!("Error during StopMgr processing: {}", e),
                }
            }

            // LongCtrl processing
            let input = long_ctrl::InputData {
                target_velocity_kph: ds.stop_mgr_output.velocity_kph,
                accel_cap_ms2: ds.stop_mgr_output.accel_ms2,
                current_speed_ms: veh_state.speed_ms,
                now,
            };

            match ds.long_ctrl.proc(&input) {
                Ok((output, report)) => {
                    ds.long_ctrl_output = output;
                    ds.long_ctrl_report = report;
                }
                Err(e) => {
                    // Drop the demand rather than act on a bad value
                    ds.long_ctrl_output = long_ctrl::OutputData::default();
                    warn!("Error during LongCtrl processing: {}", e);
                }
            }
        }

        // ---- WRITE ARCHIVES ----

        if stop_mgr_enabled {
            if let Err(e) = ds.stop_mgr.write() {
                warn!("Could not archive StopMgr data: {}", e);
            }
        }
        if let Err(e) = ds.long_ctrl.write() {
            warn!("Could not archive LongCtrl data: {}", e);
        }

        // ---- TELEMETRY ----

        tm_timer.update(Instant::now());
        if tm_timer.fired() {
            tm_client.send(&ds.stop_mgr_report.brief());
        }

        // ---- CYCLE MANAGEMENT ----

        // A non-cyclic route that has serviced its last stop and wound down
        // ends the execution
        if ds.stop_mgr.is_ended() && ds.stop_mgr.zone() == stop_mgr::Zone::Inactive {
            info!("All stops serviced, stopping");
            break;
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    session.exit();

    Ok(())
}
