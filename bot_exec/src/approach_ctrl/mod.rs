//! # Approach control module
//!
//! Approach control is responsible for bringing the robot to its hold position relative to the
//! tracked marker. It runs an independent proportional controller on each body axis: the axis
//! error (the smoothed pose component) is multiplied by a gain, saturated at the axis power
//! limit, and raised to a minimum floor when the demand would be too small to overcome static
//! friction. Errors inside the axis tolerance command exactly zero power, giving each axis a
//! dead-band around the target.
//!
//! Two control strategies are supported through the same interface: a three axis mode driving
//! axial, lateral and yaw proportionally, and a constrained two axis mode in which the axial
//! approach runs at constant power until it crosses its threshold and yaw is left uncontrolled.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod controllers;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::*;
pub use params::*;
pub use state::*;
