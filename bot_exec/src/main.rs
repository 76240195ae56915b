//! Main executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Vision sensor sampling
//!         - Acquisition processing (smoothing, approach control, wheel mixing)
//!         - Actuation
//!         - Cycle management
//!
//! The demo binary binds the acquisition manager to simulated equipment: a scripted pose sensor
//! which converges on the marker with a dropout window in the middle of the run, and an actuator
//! port which records the applied powers. Real hosts bind their own `PoseSensor` and
//! `ActuatorPort` implementations instead.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use bot_lib::data_store::{DataStore, SafeModeCause};
use bot_lib::sim_sensor::{SimActuator, SimSensor};
use bot_lib::vision::PipelineSwitch;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{error, info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use hw_if::eqpt::mech::ActuatorPort;
use hw_if::eqpt::vision::{Pipeline, PipelineSelector, PoseSensor};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Number of cycles the demo run executes.
const DEMO_NUM_CYCLES: usize = 300;

/// Cycles during which the simulated sensor loses the marker.
const DEMO_DROPOUT: std::ops::Range<usize> = 120..150;

/// Cycles during which the simulated operator holds the enable toggle to disable output.
const DEMO_TOGGLE_OFF: std::ops::Range<usize> = 200..205;

/// Cycles during which the simulated operator holds the enable toggle to re-enable output.
const DEMO_TOGGLE_ON: std::ops::Range<usize> = 230..235;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("bot_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Tagbot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.acq_mgr
        .init("vision.toml", "approach_ctrl.toml", &session)
        .wrap_err("Failed to initialise AcqMgr")?;
    info!("AcqMgr init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE EQUIPMENT ----

    let mut sensor = SimSensor::new(DEMO_NUM_CYCLES, DEMO_DROPOUT);
    let mut actuator = SimActuator::new();

    let pipeline_switch = PipelineSwitch::new(Pipeline::AprilTag);
    sensor
        .switch_to(pipeline_switch.current())
        .wrap_err("Failed to select the vision pipeline")?;

    info!(
        "Simulated equipment initialised, vision pipeline: {}",
        pipeline_switch.current()
    );

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    for cycle in 0..DEMO_NUM_CYCLES {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- OPERATOR INPUT ----

        // The simulated operator holds the toggle over several cycles, the edge-triggered
        // debounce must flip the latch only once per press
        let toggle_pressed = DEMO_TOGGLE_OFF.contains(&cycle) || DEMO_TOGGLE_ON.contains(&cycle);
        ds.acq_mgr.enable_toggle(toggle_pressed);

        // ---- DATA INPUT ----

        let sample = match sensor.sample() {
            Ok(s) => {
                ds.make_unsafe(SafeModeCause::SensorFailed).ok();
                s
            }
            Err(e) => {
                if !ds.safe {
                    error!("Vision sensor failure: {}", e);
                }
                ds.make_safe(SafeModeCause::SensorFailed);
                None
            }
        };

        // ---- CONTROL ALGORITHM PROCESSING ----

        match ds.acq_mgr.step(sample) {
            Ok(result) => {
                ds.wheel_powers = result.wheel_powers;
                ds.movement_result = Some(result);
            }
            Err(e) => {
                // If the demand could not be computed zero it rather than repeating the previous
                // cycle's powers
                ds.wheel_powers = hw_if::eqpt::mech::WheelPowers::zero();
                warn!("Error during AcqMgr processing: {}", e)
            }
        };

        // ---- ACTUATION ----

        match actuator.apply(&ds.wheel_powers) {
            Ok(()) => {
                ds.make_unsafe(SafeModeCause::ActuatorFailed).ok();
            }
            Err(e) => {
                if !ds.safe {
                    error!("Actuator rejected demands: {}", e);
                }
                ds.make_safe(SafeModeCause::ActuatorFailed);
            }
        }

        // ---- TELEMETRY ----

        if ds.num_cycles % 10 == 0 {
            if let Some(ref result) = ds.movement_result {
                info!("[{}] {}", result.acq_state, result.status);
            }
        }

        // ---- CYCLE MANAGEMENT ----

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

    if let Some(ref result) = ds.movement_result {
        session.save("movement_result.json", result);
    }

    info!("End of execution");

    Ok(())
}
