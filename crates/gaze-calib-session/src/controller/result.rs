use std::time::Duration;

use gaze_calib_core::{PupilObservation, ScreenPoint};
use serde::{Deserialize, Serialize};

use super::error::ResetReason;
use super::state::CalibrationState;
use crate::estimator::GazeEstimate;
use crate::sequencer::Phase;

/// What the driver hands the controller once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    /// Monotonic timestamp of the frame.
    pub now: Duration,
    pub pupils: PupilObservation,
    /// The user asked for a fresh calibration (e.g. pressed `c`).
    pub recalibrate: bool,
}

impl TickInput {
    pub fn new(now: Duration, pupils: PupilObservation) -> Self {
        Self {
            now,
            pupils,
            recalibrate: false,
        }
    }

    pub fn with_recalibrate(mut self, recalibrate: bool) -> Self {
        self.recalibrate = recalibrate;
        self
    }
}

/// What the driver renders after a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    /// Frame timestamp in seconds.
    pub now_s: f64,
    pub state: CalibrationState,
    /// Phase of the timeline after this tick's transitions.
    pub phase: Phase,
    /// 1-based index of the target to draw, if any.
    pub active_target: Option<u8>,
    /// Screen position of that target.
    pub target_position: Option<ScreenPoint>,
    /// Gaze point to draw while tracking.
    pub gaze: Option<GazeEstimate>,
    /// Set when this tick sent the session back to `Uncalibrated`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<ResetReason>,
}

impl TickOutput {
    #[inline]
    pub fn gaze_point(&self) -> Option<ScreenPoint> {
        self.gaze.map(|g| g.point)
    }
}
