//! Pipeline selection handling

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;

// Internal
use hw_if::eqpt::vision::{Pipeline, PipelineSelector, VisionSensorError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tracks the active vision pipeline and applies cycling requests to the
/// sensor.
pub struct PipelineSwitch {
    current: Pipeline,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PipelineSwitch {
    /// Create a new switch starting on the given pipeline.
    pub fn new(initial: Pipeline) -> Self {
        Self { current: initial }
    }

    /// The currently active pipeline.
    pub fn current(&self) -> Pipeline {
        self.current
    }

    /// Apply a cycling request.
    ///
    /// Moves at most one pipeline per call and clamps at the ends of the
    /// index range rather than wrapping. The sensor is only commanded when
    /// the target pipeline differs from the current one. Returns the active
    /// pipeline.
    pub fn handle_cycling(
        &mut self,
        selector: &mut dyn PipelineSelector,
        increment_pressed: bool,
        decrement_pressed: bool,
    ) -> Result<Pipeline, VisionSensorError> {
        let target = if increment_pressed {
            self.current.next()
        }
        else if decrement_pressed {
            self.current.prev()
        }
        else {
            return Ok(self.current);
        };

        if target != self.current {
            selector.switch_to(target)?;
            info!("Vision pipeline switched to {}", target);
            self.current = target;
        }

        Ok(self.current)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Selector stub recording the last commanded pipeline.
    #[derive(Default)]
    struct StubSelector {
        switched_to: Vec<Pipeline>,
    }

    impl PipelineSelector for StubSelector {
        fn switch_to(&mut self, pipeline: Pipeline) -> Result<(), VisionSensorError> {
            self.switched_to.push(pipeline);
            Ok(())
        }
    }

    #[test]
    fn test_cycling_moves_one_step() {
        let mut selector = StubSelector::default();
        let mut switch = PipelineSwitch::new(Pipeline::ColourDetection);

        let p = switch.handle_cycling(&mut selector, true, false).unwrap();
        assert_eq!(p, Pipeline::AprilTag);

        let p = switch.handle_cycling(&mut selector, false, true).unwrap();
        assert_eq!(p, Pipeline::ColourDetection);

        assert_eq!(
            selector.switched_to,
            vec![Pipeline::AprilTag, Pipeline::ColourDetection]
        );
    }

    #[test]
    fn test_cycling_clamps_at_bounds() {
        let mut selector = StubSelector::default();

        let mut switch = PipelineSwitch::new(Pipeline::Unused0);
        let p = switch.handle_cycling(&mut selector, false, true).unwrap();
        assert_eq!(p, Pipeline::Unused0);

        let mut switch = PipelineSwitch::new(Pipeline::Unused9);
        let p = switch.handle_cycling(&mut selector, true, false).unwrap();
        assert_eq!(p, Pipeline::Unused9);

        // Clamped requests never reach the sensor
        assert!(selector.switched_to.is_empty());
    }

    #[test]
    fn test_no_request_keeps_pipeline() {
        let mut selector = StubSelector::default();
        let mut switch = PipelineSwitch::new(Pipeline::AprilTag);

        let p = switch.handle_cycling(&mut selector, false, false).unwrap();
        assert_eq!(p, Pipeline::AprilTag);
        assert!(selector.switched_to.is_empty());
    }
}
