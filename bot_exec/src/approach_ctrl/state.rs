//! Implementations for the ApproachCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{AxisController, ControlStrategy, Params};
use crate::loco_ctrl::BodyCmd;
use crate::vision::TargetState;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Approach control module state.
pub struct ApproachCtrl {
    params: Params,

    axial_ctrl: AxisController,
    lateral_ctrl: AxisController,
    yaw_ctrl: AxisController,
}

/// Output of one approach control step.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ApproachOutput {
    /// Body-frame demand to hand to the locomotion mixer.
    pub body_cmd: BodyCmd,

    /// True when every controlled axis is within its tolerance on this
    /// sample.
    pub at_target: bool,
}

/// Status report for approach control processing.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StatusReport {
    /// Signed axial distance to the hold position, positive with the marker
    /// ahead.
    ///
    /// Units: meters
    pub axial_error_m: f64,

    /// Signed lateral offset from the marker centreline.
    ///
    /// Units: meters
    pub lateral_error_m: f64,

    /// Signed rotation away from facing the marker.
    ///
    /// Units: degrees
    pub yaw_error_deg: f64,

    /// Commanded axial power, positive towards the target.
    pub axial_power: f64,

    /// Commanded lateral power, positive strafing against the offset.
    pub lateral_power: f64,

    /// Commanded yaw power, positive rotating towards the target.
    pub yaw_power: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ApproachCtrl {
    /// Create a new instance of the controller from the parameters.
    pub fn new(params: &Params) -> Self {
        Self {
            params: params.clone(),
            axial_ctrl: AxisController::new(&params.axial),
            lateral_ctrl: AxisController::new(&params.lateral),
            yaw_ctrl: AxisController::new(&params.yaw),
        }
    }

    /// Replace the controller configuration.
    ///
    /// Must only be called between cycles, never while a cycle is in
    /// progress.
    pub fn configure(&mut self, params: &Params) {
        *self = Self::new(params);
    }

    /// The active configuration.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Compute the body demand for the given target state.
    ///
    /// Pure given the configuration: the same target state always produces
    /// the same demand. All axes are evaluated against the same smoothed
    /// sample, the at-target decision is never split across cycles.
    pub fn compute(&self, target: &TargetState) -> (ApproachOutput, StatusReport) {
        let mut report = StatusReport::default();

        // The hold position is the origin of the marker-relative frame, so
        // the errors are the smoothed pose components themselves
        let axial_error_m = target.smoothed.position_m[0];
        let lateral_error_m = target.smoothed.position_m[1];
        let yaw_error_deg = target.smoothed.yaw_deg;

        report.axial_error_m = axial_error_m;
        report.lateral_error_m = lateral_error_m;
        report.yaw_error_deg = yaw_error_deg;

        // Axial power towards the target, proportional or constant depending
        // on the strategy
        let axial_power = match self.params.strategy {
            ControlStrategy::ThreeAxisProportional => self.axial_ctrl.power(axial_error_m),
            ControlStrategy::TwoAxisBinaryAxial => self.axial_ctrl.binary_power(axial_error_m),
        };

        // Strafe opposite the lateral offset to bring the marker back onto
        // the centreline
        let lateral_power = self.lateral_ctrl.power(-lateral_error_m);

        // Rotate towards the marker, only in the three axis strategy
        let yaw_power = match self.params.strategy {
            ControlStrategy::ThreeAxisProportional => self.yaw_ctrl.power(yaw_error_deg),
            ControlStrategy::TwoAxisBinaryAxial => 0.0,
        };

        report.axial_power = axial_power;
        report.lateral_power = lateral_power;
        report.yaw_power = yaw_power;

        // On target only when every controlled axis is inside its tolerance
        // on this same sample
        let at_target = self.axial_ctrl.in_tolerance(axial_error_m)
            && self.lateral_ctrl.in_tolerance(lateral_error_m)
            && match self.params.strategy {
                ControlStrategy::ThreeAxisProportional => {
                    self.yaw_ctrl.in_tolerance(yaw_error_deg)
                }
                ControlStrategy::TwoAxisBinaryAxial => true,
            };

        (
            ApproachOutput {
                body_cmd: BodyCmd {
                    axial: axial_power,
                    lateral: lateral_power,
                    yaw: yaw_power,
                },
                at_target,
            },
            report,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hw_if::eqpt::vision::Pose;
    use nalgebra::Vector3;

    fn target(x: f64, y: f64, yaw_deg: f64) -> TargetState {
        TargetState {
            acquired: true,
            smoothed: Pose {
                position_m: Vector3::new(x, y, 0.0),
                yaw_deg,
            },
            raw: Pose::zero(),
            consecutive_loss_frames: 0,
        }
    }

    #[test]
    fn test_axial_error_commands_forward_motion() {
        let ctrl = ApproachCtrl::new(&Params::default());

        // Error 0.5 m with gain 1.5 gives 0.75, saturated at 0.6
        let (output, report) = ctrl.compute(&target(0.5, 0.0, 0.0));
        assert_eq!(report.axial_power, 0.6);
        assert!(output.body_cmd.axial > 0.0);
        assert!(!output.at_target);
    }

    #[test]
    fn test_lateral_error_commands_opposing_strafe() {
        let ctrl = ApproachCtrl::new(&Params::default());

        let (output, report) = ctrl.compute(&target(0.0, 0.2, 0.0));
        assert!(report.lateral_power < 0.0);
        assert!(output.body_cmd.lateral < 0.0);

        let (output, _) = ctrl.compute(&target(0.0, -0.2, 0.0));
        assert!(output.body_cmd.lateral > 0.0);
    }

    #[test]
    fn test_yaw_error_commands_rotation_towards_target() {
        let ctrl = ApproachCtrl::new(&Params::default());

        let (output, report) = ctrl.compute(&target(0.0, 0.0, 10.0));
        assert!(report.yaw_power > 0.0);
        assert!(output.body_cmd.yaw > 0.0);
    }

    #[test]
    fn test_lateral_dead_band_ignores_gain() {
        let mut params = Params::default();
        params.lateral.gain = 100.0;
        let ctrl = ApproachCtrl::new(&params);

        // 0.02 m offset is inside the 0.05 m tolerance whatever the gain
        let (output, report) = ctrl.compute(&target(0.0, 0.02, 0.0));
        assert_eq!(report.lateral_power, 0.0);
        assert_eq!(output.body_cmd.lateral, 0.0);
    }

    #[test]
    fn test_at_target_requires_every_axis() {
        let ctrl = ApproachCtrl::new(&Params::default());

        assert!(ctrl.compute(&target(0.1, 0.02, 2.0)).0.at_target);
        assert!(!ctrl.compute(&target(0.3, 0.02, 2.0)).0.at_target);
        assert!(!ctrl.compute(&target(0.1, 0.08, 2.0)).0.at_target);
        assert!(!ctrl.compute(&target(0.1, 0.02, 8.0)).0.at_target);
    }

    #[test]
    fn test_two_axis_strategy_ignores_yaw() {
        let mut params = Params::default();
        params.strategy = ControlStrategy::TwoAxisBinaryAxial;
        let ctrl = ApproachCtrl::new(&params);

        // A large yaw error neither drives yaw nor blocks at-target
        let (output, report) = ctrl.compute(&target(0.1, 0.02, 45.0));
        assert_eq!(report.yaw_power, 0.0);
        assert_eq!(output.body_cmd.yaw, 0.0);
        assert!(output.at_target);
    }

    #[test]
    fn test_two_axis_strategy_binary_axial_power() {
        let mut params = Params::default();
        params.strategy = ControlStrategy::TwoAxisBinaryAxial;
        let ctrl = ApproachCtrl::new(&params);

        // Constant full axial power regardless of the error magnitude
        let (_, report) = ctrl.compute(&target(2.0, 0.0, 0.0));
        assert_eq!(report.axial_power, 0.6);
        let (_, report) = ctrl.compute(&target(0.2, 0.0, 0.0));
        assert_eq!(report.axial_power, 0.6);

        // Zero inside the threshold
        let (_, report) = ctrl.compute(&target(0.1, 0.0, 0.0));
        assert_eq!(report.axial_power, 0.0);
    }

    #[test]
    fn test_configure_replaces_tuning() {
        let mut ctrl = ApproachCtrl::new(&Params::default());

        let mut params = Params::default();
        params.axial.max_power = 0.3;
        ctrl.configure(&params);

        let (_, report) = ctrl.compute(&target(0.5, 0.0, 0.0));
        assert_eq!(report.axial_power, 0.3);
    }
}
