use gaze_calib_core::{PupilPoint, ScreenPoint};
use serde::{Deserialize, Serialize};

use crate::fitter::CalibrationModel;

/// Gaze point produced for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazeEstimate {
    pub point: ScreenPoint,
    /// `true` when the pupil was not resolved this tick and `point` is the
    /// estimate carried over from an earlier tick.
    pub stale: bool,
}

/// Map a pupil point to integer screen coordinates.
///
/// Both axes are truncated toward zero. No clamping: points off the visible
/// area are returned as-is. Returns `None` when either axis is non-finite or
/// truncates to a value outside the `i32` range.
pub fn predict_screen_point(model: &CalibrationModel, pupil: PupilPoint) -> Option<ScreenPoint> {
    let p = model.predict(pupil);
    Some(ScreenPoint::new(to_pixel(p.x)?, to_pixel(p.y)?))
}

fn to_pixel(v: f64) -> Option<i32> {
    let v = v.trunc();
    // NaN fails both comparisons.
    (v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX)).then_some(v as i32)
}

/// Applies a fitted model to live readings, remembering the last estimate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GazeEstimator {
    last: Option<ScreenPoint>,
}

impl GazeEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn estimate(
        &mut self,
        model: &CalibrationModel,
        reading: Option<PupilPoint>,
    ) -> Option<GazeEstimate> {
        if let Some(point) = reading.and_then(|p| predict_screen_point(model, p)) {
            self.last = Some(point);
            return Some(GazeEstimate {
                point,
                stale: false,
            });
        }
        self.last.map(|point| GazeEstimate { point, stale: true })
    }

    #[inline]
    pub fn last(&self) -> Option<ScreenPoint> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze_calib_core::LinearModel;
    use nalgebra::Vector2;

    fn scale_model() -> CalibrationModel {
        CalibrationModel {
            model_x: LinearModel::new(Vector2::new(2.0, 0.0), 0.5),
            model_y: LinearModel::new(Vector2::new(0.0, -1.0), 0.0),
        }
    }

    #[test]
    fn truncates_toward_zero() {
        let model = scale_model();
        let p = predict_screen_point(&model, PupilPoint::new(10.2, 3.7)).expect("finite");
        assert_eq!(p, ScreenPoint::new(20, -3));
    }

    #[test]
    fn does_not_clamp_off_screen() {
        let model = scale_model();
        let p = predict_screen_point(&model, PupilPoint::new(5000.0, 2000.0)).expect("finite");
        assert_eq!(p, ScreenPoint::new(10000, -2000));
    }

    #[test]
    fn absent_reading_keeps_last_estimate() {
        let model = scale_model();
        let mut est = GazeEstimator::new();
        assert_eq!(est.estimate(&model, None), None);

        let fresh = est
            .estimate(&model, Some(PupilPoint::new(10.0, 10.0)))
            .expect("estimate");
        assert!(!fresh.stale);

        let held = est.estimate(&model, None).expect("retained");
        assert!(held.stale);
        assert_eq!(held.point, fresh.point);

        est.reset();
        assert_eq!(est.estimate(&model, None), None);
    }

    #[test]
    fn non_finite_prediction_is_dropped() {
        let model = CalibrationModel {
            model_x: LinearModel::new(Vector2::new(f64::NAN, 0.0), 0.0),
            model_y: LinearModel::new(Vector2::zeros(), 0.0),
        };
        assert_eq!(predict_screen_point(&model, PupilPoint::new(1.0, 1.0)), None);
    }

    #[test]
    fn out_of_range_prediction_is_dropped() {
        let model = CalibrationModel {
            model_x: LinearModel::new(Vector2::new(1e12, 0.0), 0.0),
            model_y: LinearModel::new(Vector2::zeros(), 0.0),
        };
        assert_eq!(predict_screen_point(&model, PupilPoint::new(1.0, 0.0)), None);
        assert_eq!(predict_screen_point(&model, PupilPoint::new(-1.0, 0.0)), None);

        let mut est = GazeEstimator::new();
        let edge = CalibrationModel {
            model_x: LinearModel::new(Vector2::zeros(), f64::from(i32::MIN)),
            model_y: LinearModel::new(Vector2::zeros(), f64::from(i32::MAX) + 0.5),
        };
        let fresh = est
            .estimate(&edge, Some(PupilPoint::new(0.0, 0.0)))
            .expect("in range");
        assert_eq!(fresh.point, ScreenPoint::new(i32::MIN, i32::MAX));

        let held = est
            .estimate(&model, Some(PupilPoint::new(1.0, 0.0)))
            .expect("retained");
        assert!(held.stale);
        assert_eq!(held.point, fresh.point);
    }
}
