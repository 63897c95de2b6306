use std::time::Duration;

use gaze_calib_core::ScreenPoint;
use serde::{Deserialize, Serialize};

use crate::collector::SampleCollector;
use crate::estimator::GazeEstimator;
use crate::fitter::CalibrationModel;

/// Externally visible calibration state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationState {
    Uncalibrated,
    Collecting,
    Fitting,
    Tracking,
}

/// The model lives inside `Tracking`, so it cannot outlive that state.
#[derive(Clone, Debug)]
enum Stage {
    Uncalibrated,
    Collecting,
    Fitting,
    Tracking(CalibrationModel),
}

/// Everything one calibration session owns.
///
/// Created once by [`CalibrationController::start`](crate::CalibrationController::start)
/// and mutated only through
/// [`CalibrationController::tick`](crate::CalibrationController::tick).
#[derive(Clone, Debug)]
pub struct SessionState {
    launch_time: Duration,
    stage: Stage,
    samples: SampleCollector,
    estimator: GazeEstimator,
    fit_count: usize,
    reset_count: usize,
}

impl SessionState {
    pub(crate) fn new(now: Duration) -> Self {
        Self {
            launch_time: now,
            stage: Stage::Uncalibrated,
            samples: SampleCollector::new(),
            estimator: GazeEstimator::new(),
            fit_count: 0,
            reset_count: 0,
        }
    }

    pub fn state(&self) -> CalibrationState {
        match self.stage {
            Stage::Uncalibrated => CalibrationState::Uncalibrated,
            Stage::Collecting => CalibrationState::Collecting,
            Stage::Fitting => CalibrationState::Fitting,
            Stage::Tracking(_) => CalibrationState::Tracking,
        }
    }

    /// Reference instant of the current calibration attempt.
    #[inline]
    pub fn launch_time(&self) -> Duration {
        self.launch_time
    }

    pub fn model(&self) -> Option<&CalibrationModel> {
        match &self.stage {
            Stage::Tracking(model) => Some(model),
            _ => None,
        }
    }

    #[inline]
    pub fn samples(&self) -> &SampleCollector {
        &self.samples
    }

    #[inline]
    pub fn last_estimate(&self) -> Option<ScreenPoint> {
        self.estimator.last()
    }

    /// Number of successful fits since the session was created.
    #[inline]
    pub fn fit_count(&self) -> usize {
        self.fit_count
    }

    /// Number of returns to `Uncalibrated` since the session was created.
    #[inline]
    pub fn reset_count(&self) -> usize {
        self.reset_count
    }

    pub(crate) fn samples_mut(&mut self) -> &mut SampleCollector {
        &mut self.samples
    }

    pub(crate) fn begin_collecting(&mut self) {
        if matches!(self.stage, Stage::Uncalibrated) {
            self.stage = Stage::Collecting;
        }
    }

    pub(crate) fn begin_fitting(&mut self) {
        self.stage = Stage::Fitting;
    }

    pub(crate) fn start_tracking(&mut self, model: CalibrationModel) {
        self.stage = Stage::Tracking(model);
        self.estimator.reset();
        self.fit_count += 1;
    }

    /// Back to `Uncalibrated`: drop the model, samples and last estimate,
    /// and restart the timeline at `now`.
    pub(crate) fn reset(&mut self, now: Duration) {
        self.stage = Stage::Uncalibrated;
        self.launch_time = now;
        self.samples.clear();
        self.estimator.reset();
        self.reset_count += 1;
    }

    /// Split borrow for estimation: the model and the estimator together.
    pub(crate) fn tracking_parts(&mut self) -> Option<(&CalibrationModel, &mut GazeEstimator)> {
        match &self.stage {
            Stage::Tracking(model) => Some((model, &mut self.estimator)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze_calib_core::{LinearModel, PupilPoint};
    use nalgebra::Vector2;

    fn model() -> CalibrationModel {
        CalibrationModel {
            model_x: LinearModel::new(Vector2::new(1.0, 0.0), 0.0),
            model_y: LinearModel::new(Vector2::new(0.0, 1.0), 0.0),
        }
    }

    #[test]
    fn new_session_is_uncalibrated_at_launch() {
        let s = SessionState::new(Duration::from_secs(7));
        assert_eq!(s.state(), CalibrationState::Uncalibrated);
        assert_eq!(s.launch_time(), Duration::from_secs(7));
        assert!(s.model().is_none());
    }

    #[test]
    fn reset_discards_model_and_samples() {
        let mut s = SessionState::new(Duration::ZERO);
        s.samples_mut().record(1, Some(PupilPoint::new(1.0, 2.0)));
        s.begin_collecting();
        s.begin_fitting();
        s.start_tracking(model());
        assert_eq!(s.state(), CalibrationState::Tracking);
        assert!(s.model().is_some());

        s.reset(Duration::from_secs(30));
        assert_eq!(s.state(), CalibrationState::Uncalibrated);
        assert!(s.model().is_none());
        assert_eq!(s.launch_time(), Duration::from_secs(30));
        assert_eq!(s.samples().missing().len(), 5);
        assert_eq!((s.fit_count(), s.reset_count()), (1, 1));
    }

    #[test]
    fn begin_collecting_only_leaves_uncalibrated() {
        let mut s = SessionState::new(Duration::ZERO);
        s.start_tracking(model());
        s.begin_collecting();
        assert_eq!(s.state(), CalibrationState::Tracking);
    }
}
