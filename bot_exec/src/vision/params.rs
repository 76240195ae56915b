//! Parameters structure for the vision filter

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the marker pose filter.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Number of frames held in the moving-average window.
    ///
    /// Doubles as the consecutive-loss count at which the filter resets
    /// itself: once this many frames pass without a detection every retained
    /// sample is stale.
    pub avg_window_frames: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            avg_window_frames: 90,
        }
    }
}
