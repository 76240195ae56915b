//! Implementations for the marker pose filter

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector3;
use serde::Serialize;
use std::collections::VecDeque;

// Internal
use super::Params;
use hw_if::eqpt::vision::Pose;
use util::maths::mean;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Bounded moving-average filter over marker pose samples.
///
/// The filter owns its histories and loss counters exclusively, no other
/// component may mutate them.
pub struct PoseFilter {
    params: Params,

    x_history: VecDeque<f64>,
    y_history: VecDeque<f64>,
    z_history: VecDeque<f64>,

    consecutive_loss_frames: u32,
    valid_frame_count: u32,

    last_raw: Pose,
    last_smoothed: Pose,
}

/// Smoothed state of the tracked marker.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct TargetState {
    /// True when a pose estimate is available on this cycle. The pose fields
    /// retain their last-known values when this is clear, callers must gate
    /// on `acquired` before acting on them.
    pub acquired: bool,

    /// Moving-average pose estimate. Yaw is the latest raw value, angles are
    /// not averaged.
    pub smoothed: Pose,

    /// The most recent raw sample.
    pub raw: Pose,

    /// Number of consecutive cycles without a valid detection.
    pub consecutive_loss_frames: u32,
}

/// Status report for vision filter processing.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct FilterStatusReport {
    /// Number of valid samples ingested since the last reset.
    pub valid_frame_count: u32,

    /// Current number of samples held in each axis history.
    pub history_len: usize,

    /// True when the loss-driven reset fired on this cycle.
    pub history_cleared: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseFilter {
    /// Create a new filter from the parameters.
    pub fn new(params: &Params) -> Self {
        Self {
            params: params.clone(),
            x_history: VecDeque::with_capacity(params.avg_window_frames),
            y_history: VecDeque::with_capacity(params.avg_window_frames),
            z_history: VecDeque::with_capacity(params.avg_window_frames),
            consecutive_loss_frames: 0,
            valid_frame_count: 0,
            last_raw: Pose::zero(),
            last_smoothed: Pose::zero(),
        }
    }

    /// Ingest one sensor reading and produce the current target state.
    ///
    /// A present sample is appended to the histories and resets the loss
    /// counter. An absent sample increments the loss counter, and when the
    /// counter reaches the window length the histories are cleared so the
    /// filter does not keep averaging stale data indefinitely.
    pub fn ingest(&mut self, sample: Option<Pose>) -> (TargetState, FilterStatusReport) {
        let mut report = FilterStatusReport::default();

        let acquired = match sample {
            Some(pose) => {
                self.push_sample(&pose);
                self.consecutive_loss_frames = 0;
                self.valid_frame_count += 1;

                // The average is valid from the very first sample, a full
                // window is not required.
                self.last_smoothed = Pose {
                    position_m: Vector3::new(
                        mean(self.x_history.iter().copied()).unwrap_or(0.0),
                        mean(self.y_history.iter().copied()).unwrap_or(0.0),
                        mean(self.z_history.iter().copied()).unwrap_or(0.0),
                    ),
                    yaw_deg: pose.yaw_deg,
                };
                self.last_raw = pose;

                true
            }
            None => {
                self.consecutive_loss_frames += 1;

                if self.consecutive_loss_frames >= self.params.avg_window_frames as u32 {
                    debug!(
                        "Marker lost for {} consecutive frames, clearing pose histories",
                        self.consecutive_loss_frames
                    );
                    self.clear_histories();
                    report.history_cleared = true;
                }

                false
            }
        };

        report.valid_frame_count = self.valid_frame_count;
        report.history_len = self.x_history.len();

        (
            TargetState {
                acquired,
                smoothed: self.last_smoothed,
                raw: self.last_raw,
                consecutive_loss_frames: self.consecutive_loss_frames,
            },
            report,
        )
    }

    /// Clear all filter state, ready for a new run.
    pub fn reset(&mut self) {
        self.clear_histories();
        self.last_raw = Pose::zero();
        self.last_smoothed = Pose::zero();
    }

    /// Current number of samples held in each axis history.
    pub fn history_len(&self) -> usize {
        self.x_history.len()
    }

    /// Append a sample to the histories, evicting the oldest entries beyond
    /// the window length.
    fn push_sample(&mut self, pose: &Pose) {
        self.x_history.push_back(pose.position_m[0]);
        self.y_history.push_back(pose.position_m[1]);
        self.z_history.push_back(pose.position_m[2]);

        // The three histories always evict together so they describe the
        // same frames.
        while self.x_history.len() > self.params.avg_window_frames {
            self.x_history.pop_front();
            self.y_history.pop_front();
            self.z_history.pop_front();
        }
    }

    /// Clear the histories and both counters together, never partially.
    fn clear_histories(&mut self) {
        self.x_history.clear();
        self.y_history.clear();
        self.z_history.clear();
        self.valid_frame_count = 0;
        self.consecutive_loss_frames = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pose(x: f64, y: f64, z: f64, yaw_deg: f64) -> Pose {
        Pose {
            position_m: Vector3::new(x, y, z),
            yaw_deg,
        }
    }

    fn filter(window: usize) -> PoseFilter {
        PoseFilter::new(&Params {
            avg_window_frames: window,
        })
    }

    #[test]
    fn test_single_sample_average_valid_immediately() {
        let mut filter = filter(90);

        let (target, report) = filter.ingest(Some(pose(1.2, -0.3, 0.1, 4.0)));
        assert!(target.acquired);
        assert_eq!(target.smoothed.position_m, Vector3::new(1.2, -0.3, 0.1));
        assert_eq!(target.smoothed.yaw_deg, 4.0);
        assert_eq!(report.history_len, 1);
        assert_eq!(report.valid_frame_count, 1);
    }

    #[test]
    fn test_identical_samples_converge_to_sample() {
        let mut filter = filter(90);
        let sample = pose(0.8, 0.2, 0.0, -2.0);

        let mut target = TargetState::default();
        for _ in 0..10 {
            target = filter.ingest(Some(sample)).0;
        }

        assert!(target.acquired);
        assert_eq!(target.smoothed.position_m, sample.position_m);
    }

    #[test]
    fn test_average_over_distinct_samples() {
        let mut filter = filter(90);

        filter.ingest(Some(pose(1.0, 0.4, 0.0, 0.0)));
        let (target, _) = filter.ingest(Some(pose(3.0, 0.2, 0.0, 0.0)));

        assert_eq!(target.smoothed.position_m[0], 2.0);
        assert!((target.smoothed.position_m[1] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut filter = filter(3);

        for i in 0..4 {
            filter.ingest(Some(pose(i as f64, 0.0, 0.0, 0.0)));
        }

        // Sample 0 was evicted, leaving (1, 2, 3)
        assert_eq!(filter.history_len(), 3);
        let (target, _) = filter.ingest(Some(pose(4.0, 0.0, 0.0, 0.0)));
        assert_eq!(target.smoothed.position_m[0], 3.0);
    }

    #[test]
    fn test_loss_counter_and_reset_at_window_length() {
        let mut filter = filter(5);

        filter.ingest(Some(pose(1.0, 0.0, 0.0, 0.0)));

        // One loss short of the window leaves the history intact
        for _ in 0..3 {
            filter.ingest(None);
        }
        let (target, report) = filter.ingest(None);
        assert!(!target.acquired);
        assert_eq!(target.consecutive_loss_frames, 4);
        assert_eq!(report.history_len, 1);
        assert!(!report.history_cleared);

        // The fifth consecutive loss fires the reset, clearing both the
        // histories and the loss counter
        let (target, report) = filter.ingest(None);
        assert!(report.history_cleared);
        assert_eq!(report.history_len, 0);
        assert_eq!(target.consecutive_loss_frames, 0);
        assert_eq!(report.valid_frame_count, 0);
    }

    #[test]
    fn test_successful_sample_resets_loss_counter() {
        let mut filter = filter(10);

        filter.ingest(None);
        filter.ingest(None);
        let (target, _) = filter.ingest(Some(pose(1.0, 0.0, 0.0, 0.0)));

        assert!(target.acquired);
        assert_eq!(target.consecutive_loss_frames, 0);
    }

    #[test]
    fn test_reset_clears_all_state() {
        let mut filter = filter(10);

        filter.ingest(Some(pose(1.0, 1.0, 1.0, 1.0)));
        filter.reset();

        assert_eq!(filter.history_len(), 0);
        let (target, report) = filter.ingest(None);
        assert_eq!(target.smoothed.position_m, Vector3::zeros());
        assert_eq!(report.valid_frame_count, 0);
    }
}
