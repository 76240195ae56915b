//! Parameters structures for the approach controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Proportional control configuration for one body axis.
///
/// Read-only after construction, shared by reference across cycles.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AxisParams {
    /// Error magnitude at or below which the axis is on target and commands
    /// zero power.
    ///
    /// Units: meters for position axes, degrees for yaw
    pub tolerance: f64,

    /// Proportional gain applied to the error.
    pub gain: f64,

    /// Largest power magnitude the axis may command.
    ///
    /// Units: normalised [0, 1]
    pub max_power: f64,

    /// Smallest non-zero power magnitude. Demands between zero and this value
    /// are raised to it so the robot can overcome static friction.
    ///
    /// Units: normalised [0, 1]
    pub min_power: f64,
}

/// Parameters for the approach controller.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// The control strategy to run.
    pub strategy: ControlStrategy,

    /// Forward/backward axis configuration. Units: meters
    pub axial: AxisParams,

    /// Strafe axis configuration. Units: meters
    pub lateral: AxisParams,

    /// Rotation axis configuration, only controlled under
    /// [`ControlStrategy::ThreeAxisProportional`]. Units: degrees
    pub yaw: AxisParams,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Selects which control law drives the approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStrategy {
    /// Proportional control on axial, lateral and yaw.
    ThreeAxisProportional,

    /// Axial at constant power until within tolerance, proportional lateral,
    /// yaw uncontrolled.
    TwoAxisBinaryAxial,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    /// The shipped approach tuning.
    fn default() -> Self {
        Self {
            strategy: ControlStrategy::ThreeAxisProportional,
            axial: AxisParams {
                tolerance: 0.15,
                gain: 1.5,
                max_power: 0.6,
                min_power: 0.15,
            },
            lateral: AxisParams {
                tolerance: 0.05,
                gain: 1.5,
                max_power: 0.6,
                min_power: 0.15,
            },
            yaw: AxisParams {
                tolerance: 5.0,
                gain: 0.03,
                max_power: 0.4,
                min_power: 0.15,
            },
        }
    }
}
