//! # Hardware interface crate.
//!
//! Provides the narrow interfaces between the control core and the robot's
//! hardware. The core only ever talks to the equipment through the traits
//! defined here, so it carries no dependency on any vendor hardware library.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data and port definitions for equipment (drive motors and vision sensor)
pub mod eqpt;
