//! # Locomotion control module
//!
//! Locomotion control converts body-frame velocity demands into power demands for the four
//! wheels of the mecanum drive. The mixing itself is a pure calculation, the module state adds
//! the safe-mode latch which forces all outputs to zero while engaged.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_mecanum;
mod cmd;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use calc_mecanum::*;
pub use cmd::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LocoCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum LocoCtrlError {
    #[error("Recieved an invalid body command: {0:?}")]
    InvalidCmd(BodyCmd),
}
