use std::time::Duration;

use gaze_calib_core::{Eye, LinearRegression};
use serde::{Deserialize, Serialize};

use super::error::SessionConfigError;
use crate::layout::ScreenLayout;
use crate::sequencer::{timeline_fits, DEFAULT_PHASE_DURATION};

fn default_phase_duration_s() -> f64 {
    DEFAULT_PHASE_DURATION.as_secs_f64()
}

fn default_rank_tol() -> f64 {
    LinearRegression::default().rank_tol
}

/// Configuration for a calibration session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Length of every phase (settle, each target, fit window), in seconds.
    #[serde(default = "default_phase_duration_s")]
    pub phase_duration_s: f64,
    /// Display geometry the targets are placed on.
    #[serde(default)]
    pub layout: ScreenLayout,
    /// Eye whose pupil drives calibration and estimation.
    #[serde(default)]
    pub eye: Eye,
    /// Relative singular-value cutoff used by the mapping fit.
    #[serde(default = "default_rank_tol")]
    pub rank_tol: f64,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            phase_duration_s: default_phase_duration_s(),
            layout: ScreenLayout::default(),
            eye: Eye::default(),
            rank_tol: default_rank_tol(),
        }
    }
}

impl SessionParams {
    /// Validated phase duration.
    ///
    /// Durations so long that the session timeline (settle, five targets,
    /// fit window) would overflow [`Duration`] are rejected.
    pub fn phase_duration(&self) -> Result<Duration, SessionConfigError> {
        let secs = self.phase_duration_s;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(SessionConfigError::InvalidPhaseDuration(secs));
        }
        let duration = Duration::try_from_secs_f64(secs)
            .map_err(|_| SessionConfigError::InvalidPhaseDuration(secs))?;
        if duration.is_zero() || !timeline_fits(duration) {
            return Err(SessionConfigError::InvalidPhaseDuration(secs));
        }
        Ok(duration)
    }

    /// Validated regression settings.
    pub fn regression(&self) -> Result<LinearRegression, SessionConfigError> {
        if !self.rank_tol.is_finite() || self.rank_tol < 0.0 {
            return Err(SessionConfigError::InvalidRankTolerance(self.rank_tol));
        }
        Ok(LinearRegression::new(self.rank_tol))
    }

    pub fn validate(&self) -> Result<(), SessionConfigError> {
        self.phase_duration()?;
        self.regression()?;
        self.layout.validate()
    }
}
