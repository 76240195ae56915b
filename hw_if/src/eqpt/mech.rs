//! # Drive Equipment Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Normalised power demands for all four drive motors.
///
/// Each demand is in the range [-1.0, +1.0]. Demands are always scaled together so that the
/// largest magnitude across the four never exceeds 1.0.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WheelPowers {
    pub front_left: f64,
    pub front_right: f64,
    pub back_left: f64,
    pub back_right: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of the four drive motors.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum MotorId {
    DrvFL,
    DrvFR,
    DrvBL,
    DrvBR,
}

/// Errors raised by an actuator port.
#[derive(Debug, Error)]
pub enum MechError {
    /// A motor binding is missing. All four motors must be bound before any of them is driven.
    #[error("Motor {:?} is not bound, check the robot configuration name \"{}\"", .0, .0.config_name())]
    MotorNotBound(MotorId),

    /// The port failed to issue the demands to the motors.
    #[error("Failed to apply the wheel demands: {0}")]
    ApplyFailed(String),
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// A port through which wheel power demands reach the drive motors.
///
/// Implementations are fire-and-forget: `apply` is safe to call on every control cycle, including
/// with all-zero powers.
pub trait ActuatorPort {
    /// Apply the given wheel powers to the motors.
    fn apply(&mut self, powers: &WheelPowers) -> Result<(), MechError>;
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl WheelPowers {
    /// All four demands at zero, bringing the robot to a stop.
    pub fn zero() -> Self {
        Self {
            front_left: 0.0,
            front_right: 0.0,
            back_left: 0.0,
            back_right: 0.0,
        }
    }

    /// The largest demand magnitude across the four wheels.
    pub fn max_abs(&self) -> f64 {
        self.front_left
            .abs()
            .max(self.front_right.abs())
            .max(self.back_left.abs())
            .max(self.back_right.abs())
    }
}

impl Default for WheelPowers {
    fn default() -> Self {
        Self::zero()
    }
}

impl MotorId {
    /// All drive motors in mixing order.
    pub const ALL: [MotorId; 4] = [
        MotorId::DrvFL,
        MotorId::DrvFR,
        MotorId::DrvBL,
        MotorId::DrvBR,
    ];

    /// The name of the motor in the robot configuration.
    pub fn config_name(&self) -> &'static str {
        match self {
            MotorId::DrvFL => "fL",
            MotorId::DrvFR => "fR",
            MotorId::DrvBL => "bL",
            MotorId::DrvBR => "bR",
        }
    }
}
