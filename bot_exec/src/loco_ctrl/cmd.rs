//! Commands passed into LocoCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A body-frame velocity demand for the mecanum drive.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct BodyCmd {
    /// Forward demand, positive driving the robot forwards.
    ///
    /// Units: normalised [-1, +1]
    pub axial: f64,

    /// Strafe demand, positive driving the robot to the right.
    ///
    /// Units: normalised [-1, +1]
    pub lateral: f64,

    /// Rotation demand, positive rotating the robot towards a target at positive yaw.
    ///
    /// Units: normalised [-1, +1]
    pub yaw: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BodyCmd {
    /// A zero demand, bringing the robot to a stop.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Determine if the command is valid (i.e. all components are finite).
    pub fn is_valid(&self) -> bool {
        self.axial.is_finite() && self.lateral.is_finite() && self.yaw.is_finite()
    }
}
