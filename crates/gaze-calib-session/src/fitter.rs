//! Pupil-to-screen mapping fit.

use gaze_calib_core::{
    FitDiagnostics, LinearModel, LinearRegression, PupilPoint, RegressionError,
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::sequencer::{CalibrationTarget, TARGET_COUNT};

/// Two independent affine regressors, one per screen axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    pub model_x: LinearModel,
    pub model_y: LinearModel,
}

impl CalibrationModel {
    /// Continuous screen position for a pupil point.
    #[inline]
    pub fn predict(&self, pupil: PupilPoint) -> Point2<f64> {
        Point2::new(self.model_x.predict(pupil), self.model_y.predict(pupil))
    }
}

/// Fitted model with per-axis diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationFit {
    pub model: CalibrationModel,
    pub diagnostics_x: FitDiagnostics,
    pub diagnostics_y: FitDiagnostics,
}

impl CalibrationFit {
    #[inline]
    pub fn is_well_posed(&self) -> bool {
        self.diagnostics_x.is_well_posed() && self.diagnostics_y.is_well_posed()
    }
}

/// Fits `screen_x ~ pupil` and `screen_y ~ pupil` by ordinary least squares.
#[derive(Clone, Copy, Debug, Default)]
pub struct MappingFitter {
    regression: LinearRegression,
}

impl MappingFitter {
    pub fn new(regression: LinearRegression) -> Self {
        Self { regression }
    }

    #[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
    pub fn fit(
        &self,
        targets: &[CalibrationTarget; TARGET_COUNT],
        pupils: &[PupilPoint; TARGET_COUNT],
    ) -> Result<CalibrationFit, RegressionError> {
        let xs = targets.map(|t| f64::from(t.position.x));
        let ys = targets.map(|t| f64::from(t.position.y));

        let fit_x = self.regression.fit(pupils, &xs)?;
        let fit_y = self.regression.fit(pupils, &ys)?;

        let fit = CalibrationFit {
            model: CalibrationModel {
                model_x: fit_x.model,
                model_y: fit_y.model,
            },
            diagnostics_x: fit_x.diagnostics,
            diagnostics_y: fit_y.diagnostics,
        };

        if !fit.is_well_posed() {
            log::warn!(
                "degenerate calibration: pupil samples span rank {} (need 2), predictions will be unreliable",
                fit.diagnostics_x.rank
            );
        }
        log::info!(
            "mapping fitted: rms residual x={:.2}px y={:.2}px, condition={:.1}",
            fit.diagnostics_x.rms_residual,
            fit.diagnostics_y.rms_residual,
            fit.diagnostics_x.condition_number
        );

        Ok(fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalibrationSequencer, ScreenLayout, DEFAULT_PHASE_DURATION};
    use approx::assert_abs_diff_eq;

    fn sequencer() -> CalibrationSequencer {
        CalibrationSequencer::new(&ScreenLayout::default(), DEFAULT_PHASE_DURATION)
            .expect("sequencer")
    }

    #[test]
    fn interpolates_training_points() {
        let seq = sequencer();
        let pupils = [
            PupilPoint::new(100.0, 100.0),
            PupilPoint::new(200.0, 100.0),
            PupilPoint::new(200.0, 200.0),
            PupilPoint::new(100.0, 200.0),
            PupilPoint::new(150.0, 150.0),
        ];

        let fit = MappingFitter::default()
            .fit(seq.targets(), &pupils)
            .expect("fit");
        assert!(fit.is_well_posed());

        for (target, pupil) in seq.targets().iter().zip(&pupils) {
            let predicted = fit.model.predict(*pupil);
            assert_abs_diff_eq!(predicted.x, f64::from(target.position.x), epsilon = 1e-6);
            assert_abs_diff_eq!(predicted.y, f64::from(target.position.y), epsilon = 1e-6);
        }
    }

    #[test]
    fn axes_are_fitted_independently() {
        let seq = sequencer();
        // Mirrored horizontally: larger pupil x means smaller screen x.
        let pupils = [
            PupilPoint::new(300.0, 40.0),
            PupilPoint::new(260.0, 40.0),
            PupilPoint::new(260.0, 70.0),
            PupilPoint::new(300.0, 70.0),
            PupilPoint::new(280.0, 55.0),
        ];
        let fit = MappingFitter::default()
            .fit(seq.targets(), &pupils)
            .expect("fit");

        assert!(fit.model.model_x.coefficients.x < 0.0);
        assert_abs_diff_eq!(fit.model.model_x.coefficients.y, 0.0, epsilon = 1e-9);
        assert!(fit.model.model_y.coefficients.y > 0.0);
        assert_abs_diff_eq!(fit.model.model_y.coefficients.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn frozen_pupil_still_produces_a_model() {
        let seq = sequencer();
        let pupils = [PupilPoint::new(120.0, 90.0); TARGET_COUNT];
        let fit = MappingFitter::default()
            .fit(seq.targets(), &pupils)
            .expect("degenerate fit is accepted");
        assert!(!fit.is_well_posed());
        let p = fit.model.predict(PupilPoint::new(120.0, 90.0));
        assert_abs_diff_eq!(p.x, 640.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 360.0, epsilon = 1e-9);
    }
}
