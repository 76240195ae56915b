//! # Approach controllers module
//!
//! This module provides the per-axis controllers used by ApproachCtrl.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::AxisParams;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A proportional controller for one body axis, with dead-band, saturation
/// and a minimum-power floor.
#[derive(Debug, Clone, Copy)]
pub struct AxisController {
    params: AxisParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AxisController {
    /// Create a new controller with the given axis configuration.
    pub fn new(params: &AxisParams) -> Self {
        Self { params: *params }
    }

    /// Get the power demand for the given error.
    pub fn power(&self, error: f64) -> f64 {
        // Errors on target command exactly zero, the boundary is inclusive
        if error.abs() <= self.params.tolerance {
            return 0.0;
        }

        let mut power = error * self.params.gain;

        // Saturate at the axis limit
        power = clamp(&power, &(-self.params.max_power), &self.params.max_power);

        // Demands too small to move the robot are raised to the friction
        // floor, keeping their sign. An exactly-zero demand is never raised.
        if power.abs() > 0.0 && power.abs() < self.params.min_power {
            power = power.signum() * self.params.min_power;
        }

        power
    }

    /// Get the constant-power demand for the given error: the full axis power
    /// outside tolerance, zero inside.
    pub fn binary_power(&self, error: f64) -> f64 {
        if error.abs() <= self.params.tolerance {
            0.0
        }
        else {
            error.signum() * self.params.max_power
        }
    }

    /// True when the error is within the axis tolerance (inclusive).
    pub fn in_tolerance(&self, error: f64) -> bool {
        error.abs() <= self.params.tolerance
    }
}
