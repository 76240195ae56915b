//! # Equipment Interface
//!
//! This module defines the interface structures and ports which bind the control software to the
//! robot's equipment.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod mech;
pub mod vision;
