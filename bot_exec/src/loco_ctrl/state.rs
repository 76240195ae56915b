//! Implementations for the LocoCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{mix_scaled, BodyCmd, LocoCtrlError};
use hw_if::eqpt::mech::WheelPowers;
use util::{module::State, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Locomotion control module state
#[derive(Default)]
pub struct LocoCtrl {
    pub(crate) report: StatusReport,

    /// While set all outputs are zero regardless of the commanded demand.
    is_safe: bool,
}

/// Input data to Locomotion Control.
#[derive(Default)]
pub struct InputData {
    /// The body command to be executed, or `None` if there is no demand on
    /// this cycle. No demand produces zero wheel powers.
    pub cmd: Option<BodyCmd>,
}

/// Status report for LocoCtrl processing.
#[derive(Clone, Copy, Serialize, Debug)]
pub struct StatusReport {
    /// True when the raw wheel demands exceeded the power range and were
    /// scaled back.
    pub powers_scaled: bool,

    /// The divisor applied during normalisation (1.0 when no scaling
    /// occurred).
    pub scale_factor: f64,

    /// True when the output was forced to zero by the safe-mode latch.
    pub safe: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StatusReport {
    fn default() -> Self {
        StatusReport {
            powers_scaled: false,
            scale_factor: 1.0,
            safe: false,
        }
    }
}

impl State for LocoCtrl {
    type InitData = ();
    type InitError = LocoCtrlError;

    type InputData = InputData;
    type OutputData = WheelPowers;
    type StatusReport = StatusReport;
    type ProcError = LocoCtrlError;

    /// Initialise the LocoCtrl module.
    ///
    /// There are no parameters to load, initialisation starts the module from
    /// a clean state with the safe-mode latch released.
    fn init(&mut self, _init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        *self = Self::default();

        Ok(())
    }

    /// Perform cyclic processing of Locomotion Control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the status report
        self.report = StatusReport::default();

        // While the safe-mode latch is engaged the commanded demand is
        // bypassed entirely, the wheels must not move.
        if self.is_safe {
            self.report.safe = true;
            return Ok((WheelPowers::zero(), self.report));
        }

        let output = match input_data.cmd {
            Some(cmd) => {
                if !cmd.is_valid() {
                    return Err(LocoCtrlError::InvalidCmd(cmd));
                }

                let (powers, scale) = mix_scaled(&cmd);
                self.report.powers_scaled = scale > 1.0;
                self.report.scale_factor = scale;
                powers
            }
            None => WheelPowers::zero(),
        };

        trace!(
            "LocoCtrl output: fl {:.3}, fr {:.3}, bl {:.3}, br {:.3}",
            output.front_left,
            output.front_right,
            output.back_left,
            output.back_right
        );

        Ok((output, self.report))
    }
}

impl LocoCtrl {
    /// Engage the safe-mode latch.
    ///
    /// From the next processing cycle onwards all outputs are zero until
    /// [`LocoCtrl::make_unsafe`] releases the latch.
    pub fn make_safe(&mut self) {
        self.is_safe = true;
    }

    /// Release the safe-mode latch.
    pub fn make_unsafe(&mut self) {
        self.is_safe = false;
    }

    /// True while the safe-mode latch is engaged.
    pub fn is_safe(&self) -> bool {
        self.is_safe
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_no_cmd_gives_zero_powers() {
        let mut loco = LocoCtrl::default();

        let (powers, report) = loco.proc(&InputData { cmd: None }).unwrap();
        assert_eq!(powers, WheelPowers::zero());
        assert!(!report.powers_scaled);
    }

    #[test]
    fn test_safe_latch_bypasses_cmd() {
        let mut loco = LocoCtrl::default();
        let cmd = BodyCmd { axial: 0.8, lateral: 0.0, yaw: 0.0 };

        let (powers, _) = loco.proc(&InputData { cmd: Some(cmd) }).unwrap();
        assert!(powers.front_left > 0.0);

        loco.make_safe();
        assert!(loco.is_safe());
        let (powers, report) = loco.proc(&InputData { cmd: Some(cmd) }).unwrap();
        assert_eq!(powers, WheelPowers::zero());
        assert!(report.safe);

        loco.make_unsafe();
        let (powers, _) = loco.proc(&InputData { cmd: Some(cmd) }).unwrap();
        assert!(powers.front_left > 0.0);
    }

    #[test]
    fn test_invalid_cmd_rejected() {
        let mut loco = LocoCtrl::default();
        let cmd = BodyCmd { axial: f64::NAN, lateral: 0.0, yaw: 0.0 };

        assert!(loco.proc(&InputData { cmd: Some(cmd) }).is_err());
    }
}
