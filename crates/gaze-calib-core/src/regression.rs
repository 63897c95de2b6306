//! Ordinary least squares with intercept for two input features.
//!
//! The fit follows the usual recipe: translate features and targets to their
//! centroids, solve the centred system with an SVD, then recover the
//! intercept from the means. Rank-deficient inputs (a pupil that never moved,
//! or moved along a line) get the minimum-norm solution instead of an error.

use nalgebra::{DMatrix, DVector, Point2, Vector2};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Scalar affine model `value = intercept + coefficients . p`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vector2<f64>,
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vector2<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    #[inline]
    pub fn predict(&self, p: Point2<f64>) -> f64 {
        self.intercept + self.coefficients.dot(&p.coords)
    }
}

/// Regression input errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RegressionError {
    #[error("feature/target length mismatch ({features} features, {targets} targets)")]
    LengthMismatch { features: usize, targets: usize },
    #[error("need at least {min} samples, got {got}")]
    TooFewSamples { got: usize, min: usize },
    #[error("non-finite value in sample {index}")]
    NonFinite { index: usize },
    #[error("least-squares solve failed: {0}")]
    Solve(&'static str),
}

/// Numerical quality of a fit. Informational only; nothing is rejected on it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    /// Numerical rank of the centred design matrix (0..=2).
    pub rank: usize,
    /// Ratio of largest to smallest singular value; infinite when rank < 2.
    pub condition_number: f64,
    /// Root-mean-square residual over the training samples.
    pub rms_residual: f64,
}

impl FitDiagnostics {
    /// `true` when the features span a plane, i.e. the fit is well-posed.
    #[inline]
    pub fn is_well_posed(&self) -> bool {
        self.rank == 2
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegressionFit {
    pub model: LinearModel,
    pub diagnostics: FitDiagnostics,
}

/// OLS estimator for `R^2 -> R` with an intercept term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearRegression {
    /// Singular values below `rank_tol * max_singular_value` count as zero.
    pub rank_tol: f64,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self { rank_tol: 1e-10 }
    }
}

impl LinearRegression {
    pub fn new(rank_tol: f64) -> Self {
        Self { rank_tol }
    }

    /// Fit `targets[i] ~ intercept + coefficients . features[i]`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, features, targets), fields(n = features.len()))
    )]
    pub fn fit(
        &self,
        features: &[Point2<f64>],
        targets: &[f64],
    ) -> Result<RegressionFit, RegressionError> {
        if features.len() != targets.len() {
            return Err(RegressionError::LengthMismatch {
                features: features.len(),
                targets: targets.len(),
            });
        }
        if features.is_empty() {
            return Err(RegressionError::TooFewSamples { got: 0, min: 1 });
        }
        for (index, (p, t)) in features.iter().zip(targets).enumerate() {
            if !(p.x.is_finite() && p.y.is_finite() && t.is_finite()) {
                return Err(RegressionError::NonFinite { index });
            }
        }

        let n = features.len();
        let (centred, mean) = center_points(features);
        let target_mean = targets.iter().sum::<f64>() / n as f64;

        let spread = centred
            .iter()
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(0.0_f64, f64::max);

        // All samples identical: only the intercept is identifiable.
        let (coefficients, rank, condition_number) = if spread == 0.0 {
            (Vector2::zeros(), 0, f64::INFINITY)
        } else {
            self.solve_centred(&centred, targets, target_mean)?
        };
        let intercept = target_mean - coefficients.dot(&mean);
        let model = LinearModel::new(coefficients, intercept);

        let rms_residual = (features
            .iter()
            .zip(targets)
            .map(|(p, t)| (model.predict(*p) - t).powi(2))
            .sum::<f64>()
            / n as f64)
            .sqrt();

        Ok(RegressionFit {
            model,
            diagnostics: FitDiagnostics {
                rank,
                condition_number,
                rms_residual,
            },
        })
    }

    /// Minimum-norm least-squares solution of the centred `n x 2` system.
    fn solve_centred(
        &self,
        centred: &[Point2<f64>],
        targets: &[f64],
        target_mean: f64,
    ) -> Result<(Vector2<f64>, usize, f64), RegressionError> {
        let n = centred.len();
        let mut a = DMatrix::<f64>::zeros(n, 2);
        let mut b = DVector::<f64>::zeros(n);
        for (k, (p, t)) in centred.iter().zip(targets).enumerate() {
            a[(k, 0)] = p.x;
            a[(k, 1)] = p.y;
            b[k] = t - target_mean;
        }

        let svd = a.svd(true, true);
        let s_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
        let eps = self.rank_tol.max(0.0) * s_max;
        let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();
        let condition_number = if rank == 2 {
            let s_min = svd
                .singular_values
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            s_max / s_min
        } else {
            f64::INFINITY
        };

        let coef = svd.solve(&b, eps).map_err(RegressionError::Solve)?;
        Ok((Vector2::new(coef[0], coef[1]), rank, condition_number))
    }
}

/// Translate points to their centroid; returns the centred points and the centroid.
fn center_points(pts: &[Point2<f64>]) -> (Vec<Point2<f64>>, Vector2<f64>) {
    let n = pts.len() as f64;
    let mean = pts.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords) / n;
    let centred = pts.iter().map(|p| Point2::from(p.coords - mean)).collect();
    (centred, mean)
}
