//! # Vision processing module
//!
//! This module smooths the noisy per-frame pose samples produced by the vision sensor into a
//! stable target estimate. Samples for each position axis are held in bounded histories and
//! averaged, dropped frames are counted, and a sustained loss of the marker clears the histories
//! so the filter never keeps smoothing over stale data. Pipeline selection handling for the
//! sensor also lives here.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod pipeline;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use pipeline::*;
pub use state::*;
