//! # AcqMgr module
//!
//! This module implements the [`AcqMgr`] acquisition manager, which closes the loop between the
//! vision filter, the approach controller and the locomotion mixer on every control cycle. The
//! manager tracks the acquisition state machine:
//!
//! - `NoTarget` - No usable target estimate is available.
//! - `Tracking` - A target is acquired and the robot is moving towards its hold position.
//! - `AtTarget` - Every controlled axis is within tolerance.
//!
//! `Tracking` is entered on the first acquired sample, `AtTarget` whenever the controller
//! reports all axes on target, and the machine falls back to `Tracking` if the target later
//! drifts outside tolerance. A loss-driven filter reset returns the machine to `NoTarget` from
//! any state. The controller output is recomputed on every cycle while a target is acquired,
//! even in `AtTarget`, there is no stop-and-latch behaviour.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::Display;

use log::{info, warn};
use serde::Serialize;

use crate::approach_ctrl::{self, ApproachCtrl};
use crate::loco_ctrl::{self, LocoCtrl};
use crate::vision::{self, PoseFilter};
use hw_if::eqpt::mech::WheelPowers;
use hw_if::eqpt::vision::Pose;
use util::module::State;
use util::session::Session;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Acquisition manager.
///
/// Owns the vision filter, approach controller and locomotion mixer. Within one cycle the data
/// flows strictly sensor sample -> smoothing -> control -> mixing, the controller only ever sees
/// fully updated filter state.
pub struct AcqMgr {
    filter: PoseFilter,
    ctrl: ApproachCtrl,
    loco: LocoCtrl,

    acq_state: AcqState,

    /// Output-enable latch. While clear every cycle commands zero wheel powers regardless of the
    /// pose error.
    enabled: bool,

    /// Previous level of the enable toggle input, for edge detection.
    prev_toggle_pressed: bool,
}

/// Report value summarising one control cycle.
///
/// Produced fresh on every cycle, never mutated afterwards. Rendering it is the host's job.
#[derive(Clone, Debug, Serialize)]
pub struct MovementResult {
    /// True when every controlled axis was within tolerance on this cycle.
    pub at_target: bool,

    /// Human readable summary of the action taken.
    pub status: String,

    /// Commanded power towards the target along the axial axis.
    pub axial_power: f64,

    /// Commanded power against the lateral offset.
    pub lateral_power: f64,

    /// Commanded power rotating towards the target.
    pub yaw_power: f64,

    /// The wheel powers commanded this cycle.
    pub wheel_powers: WheelPowers,

    /// The acquisition state after this cycle.
    pub acq_state: AcqState,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur in the acquisition manager.
#[derive(Debug, thiserror::Error)]
pub enum AcqMgrError {
    #[error("Failed to load vision params: {0}")]
    VisionParamLoadError(util::params::LoadError),

    #[error("Failed to load approach control params: {0}")]
    ApproachParamLoadError(util::params::LoadError),

    #[error("Error in LocoCtrl: {0}")]
    LocoCtrlError(loco_ctrl::LocoCtrlError),
}

/// States of the acquisition machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AcqState {
    /// No usable target estimate is available.
    NoTarget,

    /// A target is acquired and the robot is moving towards its hold position.
    Tracking,

    /// Every controlled axis is within tolerance.
    AtTarget,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Display for AcqState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcqState::NoTarget => write!(f, "AcqState::NoTarget"),
            AcqState::Tracking => write!(f, "AcqState::Tracking"),
            AcqState::AtTarget => write!(f, "AcqState::AtTarget"),
        }
    }
}

impl Default for AcqMgr {
    fn default() -> Self {
        Self::from_params(&vision::Params::default(), &approach_ctrl::Params::default())
    }
}

impl AcqMgr {
    /// Create a manager directly from parameter values.
    ///
    /// Used where no parameter files are available, for instance embedded hosts carrying their
    /// own configuration.
    pub fn from_params(
        vision_params: &vision::Params,
        approach_params: &approach_ctrl::Params,
    ) -> Self {
        Self {
            filter: PoseFilter::new(vision_params),
            ctrl: ApproachCtrl::new(approach_params),
            loco: LocoCtrl::default(),
            acq_state: AcqState::NoTarget,
            enabled: true,
            prev_toggle_pressed: false,
        }
    }

    /// Initialise the manager, loading parameters from the given files.
    pub fn init(
        &mut self,
        vision_params_path: &str,
        approach_params_path: &str,
        session: &Session,
    ) -> Result<(), AcqMgrError> {
        let vision_params: vision::Params = util::params::load(vision_params_path)
            .map_err(AcqMgrError::VisionParamLoadError)?;
        let approach_params: approach_ctrl::Params = util::params::load(approach_params_path)
            .map_err(AcqMgrError::ApproachParamLoadError)?;

        *self = Self::from_params(&vision_params, &approach_params);
        self.loco
            .init((), session)
            .map_err(AcqMgrError::LocoCtrlError)?;

        Ok(())
    }

    /// Perform one control cycle with the given sensor reading.
    pub fn step(&mut self, sample: Option<Pose>) -> Result<MovementResult, AcqMgrError> {
        // Smoothing completes before the controller sees the new state
        let (target, filter_report) = self.filter.ingest(sample);

        // A loss-driven filter reset means the estimate is gone, fall back to NoTarget from any
        // state
        if filter_report.history_cleared {
            self.transition(AcqState::NoTarget);
        }

        // While a target is acquired the controller output is always recomputed, the target can
        // drift even after AtTarget was reached
        let (cmd, at_target, ctrl_report) = match target.acquired {
            true => {
                let (output, report) = self.ctrl.compute(&target);
                (Some(output.body_cmd), output.at_target, report)
            }
            false => (None, false, approach_ctrl::StatusReport::default()),
        };

        if target.acquired {
            self.transition(match at_target {
                true => AcqState::AtTarget,
                false => AcqState::Tracking,
            });
        }

        // Mix into wheel powers. No demand commands a stop, and the safe latch inside LocoCtrl
        // forces zero output while the manager is disabled
        let (wheel_powers, _) = self
            .loco
            .proc(&loco_ctrl::InputData { cmd })
            .map_err(AcqMgrError::LocoCtrlError)?;

        let status = if !self.enabled {
            String::from("Disabled - all outputs inhibited")
        }
        else if !target.acquired {
            String::from("Stopped - no target detected")
        }
        else if at_target {
            format!(
                "Target reached! X: {:.2}m, Y: {:.2}m, Yaw: {:.1}deg",
                target.smoothed.position_m[0],
                target.smoothed.position_m[1],
                target.smoothed.yaw_deg
            )
        }
        else {
            format!(
                "Moving - X: {:.2}m, Y: {:.2}m, Yaw: {:.1}deg",
                target.smoothed.position_m[0],
                target.smoothed.position_m[1],
                target.smoothed.yaw_deg
            )
        };

        Ok(MovementResult {
            at_target,
            status,
            axial_power: ctrl_report.axial_power,
            lateral_power: ctrl_report.lateral_power,
            yaw_power: ctrl_report.yaw_power,
            wheel_powers,
            acq_state: self.acq_state,
        })
    }

    /// Clear all filter state and loss counters, used when re-entering a run.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.acq_state = AcqState::NoTarget;
    }

    /// Replace the approach controller configuration.
    ///
    /// Must only be called between cycles, never while a cycle is in progress.
    pub fn configure(&mut self, params: &approach_ctrl::Params) {
        self.ctrl.configure(params);
    }

    /// Set the output-enable latch directly.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            match enabled {
                true => {
                    info!("Output enabled");
                    self.loco.make_unsafe();
                }
                false => {
                    warn!("Output disabled, wheel powers forced to zero");
                    self.loco.make_safe();
                }
            }
            self.enabled = enabled;
        }
    }

    /// Process the enable toggle input.
    ///
    /// The toggle is edge-triggered: the latch flips exactly once per press, on the
    /// not-pressed to pressed transition, however long the button is held. Returns the
    /// resulting enabled state.
    pub fn enable_toggle(&mut self, pressed: bool) -> bool {
        if pressed && !self.prev_toggle_pressed {
            self.set_enabled(!self.enabled);
        }
        self.prev_toggle_pressed = pressed;

        self.enabled
    }

    /// True while the output-enable latch is set.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The current acquisition state.
    pub fn acq_state(&self) -> AcqState {
        self.acq_state
    }

    fn transition(&mut self, new: AcqState) {
        if new != self.acq_state {
            info!("AcqMgr state change to: {}", new);
            self.acq_state = new;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;

    /// A manager with a single-sample window so the smoothed pose equals the raw sample, and a
    /// window small enough to drive the loss reset quickly.
    fn mgr(window: usize) -> AcqMgr {
        AcqMgr::from_params(
            &vision::Params {
                avg_window_frames: window,
            },
            &approach_ctrl::Params::default(),
        )
    }

    fn pose(x: f64, y: f64, yaw_deg: f64) -> Pose {
        Pose {
            position_m: Vector3::new(x, y, 0.0),
            yaw_deg,
        }
    }

    #[test]
    fn test_initial_state_is_no_target() {
        let mgr = mgr(1);
        assert_eq!(mgr.acq_state(), AcqState::NoTarget);
    }

    #[test]
    fn test_acquired_sample_enters_tracking_and_drives() {
        let mut mgr = mgr(1);

        let result = mgr.step(Some(pose(1.0, 0.0, 0.0))).unwrap();
        assert_eq!(result.acq_state, AcqState::Tracking);
        assert!(!result.at_target);
        assert_eq!(result.axial_power, 0.6);

        // Pure forward demand drives all four wheels forwards
        assert!(result.wheel_powers.front_left > 0.0);
        assert!(result.wheel_powers.front_right > 0.0);
        assert!(result.wheel_powers.back_left > 0.0);
        assert!(result.wheel_powers.back_right > 0.0);
    }

    #[test]
    fn test_on_target_sample_enters_at_target() {
        let mut mgr = mgr(1);

        let result = mgr.step(Some(pose(0.1, 0.02, 2.0))).unwrap();
        assert_eq!(result.acq_state, AcqState::AtTarget);
        assert!(result.at_target);
        assert_eq!(result.wheel_powers, WheelPowers::zero());
        assert!(result.status.starts_with("Target reached!"));
    }

    #[test]
    fn test_target_drift_returns_to_tracking() {
        let mut mgr = mgr(1);

        mgr.step(Some(pose(0.1, 0.02, 2.0))).unwrap();
        assert_eq!(mgr.acq_state(), AcqState::AtTarget);

        // The loop stays closed: drift is picked up on the very next cycle
        let result = mgr.step(Some(pose(0.6, 0.02, 2.0))).unwrap();
        assert_eq!(result.acq_state, AcqState::Tracking);
        assert!(result.wheel_powers.max_abs() > 0.0);
    }

    #[test]
    fn test_short_dropout_commands_stop_without_state_loss() {
        let mut mgr = mgr(3);

        mgr.step(Some(pose(1.0, 0.0, 0.0))).unwrap();

        // Two losses, one short of the window, keep the machine tracking but command a stop
        for _ in 0..2 {
            let result = mgr.step(None).unwrap();
            assert_eq!(result.acq_state, AcqState::Tracking);
            assert_eq!(result.wheel_powers, WheelPowers::zero());
            assert_eq!(result.status, "Stopped - no target detected");
        }
    }

    #[test]
    fn test_loss_reset_returns_to_no_target() {
        let mut mgr = mgr(3);

        mgr.step(Some(pose(1.0, 0.0, 0.0))).unwrap();
        assert_eq!(mgr.acq_state(), AcqState::Tracking);

        // The third consecutive loss fires the filter reset
        mgr.step(None).unwrap();
        mgr.step(None).unwrap();
        let result = mgr.step(None).unwrap();
        assert_eq!(result.acq_state, AcqState::NoTarget);
    }

    #[test]
    fn test_disable_forces_zero_powers_despite_error() {
        let mut mgr = mgr(1);

        let result = mgr.step(Some(pose(1.0, 0.3, 20.0))).unwrap();
        assert!(result.wheel_powers.max_abs() > 0.0);

        mgr.set_enabled(false);

        // Large uncentered error, but the very next actuation demand is all zero
        let result = mgr.step(Some(pose(1.0, 0.3, 20.0))).unwrap();
        assert_eq!(result.wheel_powers, WheelPowers::zero());
        assert_eq!(result.status, "Disabled - all outputs inhibited");

        mgr.set_enabled(true);
        let result = mgr.step(Some(pose(1.0, 0.3, 20.0))).unwrap();
        assert!(result.wheel_powers.max_abs() > 0.0);
    }

    #[test]
    fn test_enable_toggle_flips_once_per_press() {
        let mut mgr = mgr(1);
        assert!(mgr.is_enabled());

        // A press held over several cycles flips the latch exactly once
        assert!(!mgr.enable_toggle(true));
        assert!(!mgr.enable_toggle(true));
        assert!(!mgr.enable_toggle(true));

        // Release, then a second press flips it back
        assert!(!mgr.enable_toggle(false));
        assert!(mgr.enable_toggle(true));
        assert!(mgr.enable_toggle(false));
    }

    #[test]
    fn test_reset_clears_filter_and_state() {
        let mut mgr = mgr(1);

        mgr.step(Some(pose(1.0, 0.0, 0.0))).unwrap();
        assert_eq!(mgr.acq_state(), AcqState::Tracking);

        mgr.reset();
        assert_eq!(mgr.acq_state(), AcqState::NoTarget);
    }

    #[test]
    fn test_configure_applies_new_tuning() {
        let mut mgr = mgr(1);

        let mut params = approach_ctrl::Params::default();
        params.axial.max_power = 0.2;
        mgr.configure(&params);

        let result = mgr.step(Some(pose(1.0, 0.0, 0.0))).unwrap();
        assert_eq!(result.axial_power, 0.2);
    }
}
