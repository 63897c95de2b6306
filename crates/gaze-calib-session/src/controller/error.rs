use serde::{Deserialize, Serialize};

/// Why a session fell back to `Uncalibrated`.
///
/// None of these are fatal; every one of them simply restarts the
/// calibration sequence.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ResetReason {
    #[error("recalibration requested")]
    Requested,
    #[error("calibration incomplete: no pupil sample for targets {missing:?}")]
    IncompleteCalibration { missing: Vec<u8> },
    #[error("mapping fit failed: {message}")]
    FitFailed { message: String },
    #[error("fit window missed ({elapsed_s:.3}s since launch)")]
    FitWindowMissed { elapsed_s: f64 },
    #[error("calibration samples lost while tracking")]
    IntegrityLost,
}

/// Session configuration validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SessionConfigError {
    #[error("phase duration must be finite and > 0 seconds (got {0})")]
    InvalidPhaseDuration(f64),
    #[error("screen layout {width}x{height} cannot hold a {margin}px target margin")]
    InvalidLayout { width: i32, height: i32, margin: i32 },
    #[error("regression rank tolerance must be finite and >= 0 (got {0})")]
    InvalidRankTolerance(f64),
}
