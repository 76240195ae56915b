//! # Vision Equipment Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of processing pipelines available on the vision sensor.
pub const NUM_PIPELINES: usize = 10;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single robot pose sample relative to the detected marker.
///
/// Captured once per successful detection and never modified afterwards.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position along the body axes (x forward, y lateral, z vertical).
    ///
    /// Units: meters
    pub position_m: Vector3<f64>,

    /// Rotation required to face the marker, positive when the marker is at positive yaw.
    ///
    /// Units: degrees
    pub yaw_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised by the vision sensor.
///
/// A frame without a detection is not an error, sensors report it as `Ok(None)` from
/// [`PoseSensor::sample`]. Errors are reserved for hardware faults.
#[derive(Debug, Error)]
pub enum VisionSensorError {
    #[error("Vision sensor hardware failure: {0}")]
    HardwareFailure(String),

    #[error("Failed to switch the sensor to pipeline {0}")]
    PipelineSwitchFailed(usize),
}

/// Processing pipelines of the vision sensor.
///
/// The core treats the pipeline as an opaque index with a human readable description, the actual
/// processing each index performs is owned by the sensor firmware.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Unused0,
    ColourDetection,
    AprilTag,
    Unused3,
    Unused4,
    Unused5,
    Unused6,
    Unused7,
    Unused8,
    Unused9,
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// A sensor producing marker-relative pose samples.
pub trait PoseSensor {
    /// Take one pose sample.
    ///
    /// `Ok(None)` indicates no valid detection on this cycle and is not an error.
    fn sample(&mut self) -> Result<Option<Pose>, VisionSensorError>;
}

/// A sensor whose processing pipeline can be selected at runtime.
pub trait PipelineSelector {
    /// Switch the sensor to the given pipeline.
    fn switch_to(&mut self, pipeline: Pipeline) -> Result<(), VisionSensorError>;
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Pose {
    /// A pose at the origin with no rotation.
    pub fn zero() -> Self {
        Self {
            position_m: Vector3::zeros(),
            yaw_deg: 0.0,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::zero()
    }
}

impl Pipeline {
    /// The sensor-side index of this pipeline.
    pub fn index(&self) -> usize {
        match self {
            Pipeline::Unused0 => 0,
            Pipeline::ColourDetection => 1,
            Pipeline::AprilTag => 2,
            Pipeline::Unused3 => 3,
            Pipeline::Unused4 => 4,
            Pipeline::Unused5 => 5,
            Pipeline::Unused6 => 6,
            Pipeline::Unused7 => 7,
            Pipeline::Unused8 => 8,
            Pipeline::Unused9 => 9,
        }
    }

    /// A human readable description of the pipeline.
    pub fn description(&self) -> &'static str {
        match self {
            Pipeline::Unused0 => "Unused pipeline 0",
            Pipeline::ColourDetection => "Colour detection",
            Pipeline::AprilTag => "April tag detection",
            Pipeline::Unused3 => "Unused pipeline 3",
            Pipeline::Unused4 => "Unused pipeline 4",
            Pipeline::Unused5 => "Unused pipeline 5",
            Pipeline::Unused6 => "Unused pipeline 6",
            Pipeline::Unused7 => "Unused pipeline 7",
            Pipeline::Unused8 => "Unused pipeline 8",
            Pipeline::Unused9 => "Unused pipeline 9",
        }
    }

    /// Get the pipeline for the given index, falling back to pipeline 0 for out of range indices.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Pipeline::Unused0,
            1 => Pipeline::ColourDetection,
            2 => Pipeline::AprilTag,
            3 => Pipeline::Unused3,
            4 => Pipeline::Unused4,
            5 => Pipeline::Unused5,
            6 => Pipeline::Unused6,
            7 => Pipeline::Unused7,
            8 => Pipeline::Unused8,
            9 => Pipeline::Unused9,
            _ => Pipeline::Unused0,
        }
    }

    /// The next pipeline up, clamped at the highest index rather than wrapping.
    pub fn next(&self) -> Self {
        Self::from_index((self.index() + 1).min(NUM_PIPELINES - 1))
    }

    /// The next pipeline down, clamped at index 0 rather than wrapping.
    pub fn prev(&self) -> Self {
        Self::from_index(self.index().saturating_sub(1))
    }
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.index())
    }
}
