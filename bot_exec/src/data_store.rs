//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, warn};

use crate::acq_mgr::{AcqMgr, MovementResult};
use hw_if::eqpt::mech::WheelPowers;

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the robot has been put into safe mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SafeModeCause {
    SensorFailed,
    ActuatorFailed,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    // Safe mode variables
    /// Determines if the robot is in safe mode.
    pub safe: bool,

    /// Gives the reason for the robot being in safe mode.
    pub safe_cause: Option<SafeModeCause>,

    // Acquisition
    pub acq_mgr: AcqMgr,

    /// The movement result of the most recent cycle.
    pub movement_result: Option<MovementResult>,

    /// The wheel powers commanded on the most recent cycle.
    pub wheel_powers: WheelPowers,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Puts the robot into safe mode with the given cause.
    pub fn make_safe(&mut self, cause: SafeModeCause) {
        if !self.safe {
            warn!("Make safe requested, cause: {:?}", cause);
            self.safe = true;
            self.safe_cause = Some(cause);

            // Disable the acquisition manager's output
            self.acq_mgr.set_enabled(false);
        }
    }

    /// Attempts to disable the safe mode by clearing the given cause.
    ///
    /// Returns `Ok(())` if this cause was cleared and safe mode was disabled, or `Err(())`
    /// otherwise. To remove safe mode the provided cause must match the initial reason for safe
    /// mode being enabled.
    ///
    /// If safe mode was not enabled `Ok(())` is returned
    pub fn make_unsafe(&mut self, cause: SafeModeCause) -> Result<(), ()> {
        if !self.safe {
            return Ok(());
        }

        match self.safe_cause {
            Some(c) if c == cause => {
                info!("Safe mode cleared, cause was: {:?}", cause);
                self.safe = false;
                self.safe_cause = None;
                self.acq_mgr.set_enabled(true);
                Ok(())
            }
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_make_safe_disables_output() {
        let mut ds = DataStore::default();
        assert!(ds.acq_mgr.is_enabled());

        ds.make_safe(SafeModeCause::ActuatorFailed);
        assert!(ds.safe);
        assert!(!ds.acq_mgr.is_enabled());
    }

    #[test]
    fn test_make_unsafe_requires_matching_cause() {
        let mut ds = DataStore::default();
        ds.make_safe(SafeModeCause::SensorFailed);

        assert!(ds.make_unsafe(SafeModeCause::ActuatorFailed).is_err());
        assert!(ds.safe);

        assert!(ds.make_unsafe(SafeModeCause::SensorFailed).is_ok());
        assert!(!ds.safe);
        assert!(ds.acq_mgr.is_enabled());
    }
}
