//! # Simulated Equipment
//!
//! Provides a scripted pose sensor and a recording actuator port, used by the demo executable in
//! place of real hardware. The sensor plays back an approach track which converges on the
//! marker, with a configurable dropout window in which no detection is returned.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::ops::Range;

use log::trace;
use nalgebra::Vector3;

use hw_if::eqpt::mech::{ActuatorPort, MechError, MotorId, WheelPowers};
use hw_if::eqpt::vision::{Pipeline, PipelineSelector, Pose, PoseSensor, VisionSensorError};
use util::maths::lin_map;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A scripted pose sensor.
///
/// Samples ramp from a starting offset down towards the marker over the length of the run.
/// Cycles inside the dropout window return no detection, exercising the filter's loss handling.
pub struct SimSensor {
    cycle: usize,
    num_cycles: usize,
    dropout: Range<usize>,
    pipeline: Pipeline,
}

/// Actuator port which records the last applied powers.
pub struct SimActuator {
    bound: Vec<MotorId>,
    last_powers: WheelPowers,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimSensor {
    /// Create a new sensor playing a track of the given length with the given dropout window.
    pub fn new(num_cycles: usize, dropout: Range<usize>) -> Self {
        Self {
            cycle: 0,
            num_cycles,
            dropout,
            pipeline: Pipeline::Unused0,
        }
    }
}

impl PipelineSelector for SimSensor {
    fn switch_to(&mut self, pipeline: Pipeline) -> Result<(), VisionSensorError> {
        self.pipeline = pipeline;
        trace!("SimSensor pipeline set to {}", self.pipeline);

        Ok(())
    }
}

impl PoseSensor for SimSensor {
    fn sample(&mut self) -> Result<Option<Pose>, VisionSensorError> {
        let cycle = self.cycle;
        self.cycle += 1;

        if self.dropout.contains(&cycle) {
            return Ok(None);
        }

        // Ramp each axis from its starting offset towards the marker
        let progress = (cycle.min(self.num_cycles) as f64) / (self.num_cycles as f64);
        let x = lin_map((0.0, 1.0), (1.8, 0.05), progress);
        let y = lin_map((0.0, 1.0), (0.4, 0.01), progress);
        let yaw_deg = lin_map((0.0, 1.0), (20.0, 0.5), progress);

        Ok(Some(Pose {
            position_m: Vector3::new(x, y, 0.0),
            yaw_deg,
        }))
    }
}

impl SimActuator {
    /// Create a port with all four motors bound.
    pub fn new() -> Self {
        Self::with_motors(&MotorId::ALL)
    }

    /// Create a port with only the given motors bound.
    pub fn with_motors(motors: &[MotorId]) -> Self {
        Self {
            bound: motors.to_vec(),
            last_powers: WheelPowers::zero(),
        }
    }

    /// The powers most recently applied to the port.
    pub fn last_powers(&self) -> WheelPowers {
        self.last_powers
    }
}

impl Default for SimActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for SimActuator {
    fn apply(&mut self, powers: &WheelPowers) -> Result<(), MechError> {
        // Refuse to drive a partially bound motor set
        for id in MotorId::ALL.iter() {
            if !self.bound.contains(id) {
                return Err(MechError::MotorNotBound(*id));
            }
        }

        self.last_powers = *powers;

        trace!(
            "SimActuator powers: fl {:.3}, fr {:.3}, bl {:.3}, br {:.3}",
            powers.front_left,
            powers.front_right,
            powers.back_left,
            powers.back_right
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sensor_converges_on_marker() {
        let mut sensor = SimSensor::new(10, 0..0);

        let first = sensor.sample().unwrap().unwrap();
        let mut last = first;
        for _ in 0..9 {
            last = sensor.sample().unwrap().unwrap();
        }

        assert!(last.position_m[0] < first.position_m[0]);
        assert!(last.yaw_deg < first.yaw_deg);
    }

    #[test]
    fn test_sensor_dropout_window() {
        let mut sensor = SimSensor::new(10, 2..4);

        assert!(sensor.sample().unwrap().is_some());
        assert!(sensor.sample().unwrap().is_some());
        assert!(sensor.sample().unwrap().is_none());
        assert!(sensor.sample().unwrap().is_none());
        assert!(sensor.sample().unwrap().is_some());
    }

    #[test]
    fn test_actuator_records_powers() {
        let mut actuator = SimActuator::new();
        let powers = WheelPowers {
            front_left: 0.5,
            front_right: 0.5,
            back_left: 0.5,
            back_right: 0.5,
        };

        actuator.apply(&powers).unwrap();
        assert_eq!(actuator.last_powers(), powers);
    }

    #[test]
    fn test_partially_bound_port_refuses_to_drive() {
        let mut actuator =
            SimActuator::with_motors(&[MotorId::DrvFL, MotorId::DrvFR, MotorId::DrvBL]);

        let result = actuator.apply(&WheelPowers::zero());
        assert!(matches!(result, Err(MechError::MotorNotBound(MotorId::DrvBR))));

        // Nothing was driven
        assert_eq!(actuator.last_powers(), WheelPowers::zero());
    }
}
