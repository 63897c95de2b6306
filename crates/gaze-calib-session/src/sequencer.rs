//! Phase timeline of a calibration attempt.
//!
//! Time since launch is cut into equal phases of `phase_duration`:
//!
//! | phase | window (in phase units) | meaning |
//! |---|---|---|
//! | 0 | `[0, 1)` | settle, nothing shown |
//! | 1..=5 | `[k, k+1)` | target `k` active, samples recorded |
//! | 6 | `[6, 7)` | fit window |
//! | 7.. | `[7, inf)` | finished, no active phase |

use std::time::Duration;

use gaze_calib_core::ScreenPoint;
use serde::{Deserialize, Serialize};

use crate::controller::SessionConfigError;
use crate::layout::ScreenLayout;

/// Number of calibration targets.
pub const TARGET_COUNT: usize = 5;

/// Default length of every phase.
pub const DEFAULT_PHASE_DURATION: Duration = Duration::from_secs(3);

const FIT_PHASE: u128 = TARGET_COUNT as u128 + 1;

/// `true` when the end of the fit window, `phase_duration * 7`, is a
/// representable [`Duration`].
pub(crate) fn timeline_fits(phase_duration: Duration) -> bool {
    phase_duration.checked_mul(FIT_PHASE as u32 + 1).is_some()
}

/// Half-open interval `[start, end)` measured from calibration launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWindow {
    pub start: Duration,
    pub end: Duration,
}

impl PhaseWindow {
    #[inline]
    pub fn contains(&self, elapsed: Duration) -> bool {
        self.start <= elapsed && elapsed < self.end
    }
}

/// One fixation target of the calibration sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationTarget {
    /// 1-based position in the sequence.
    pub index: u8,
    pub position: ScreenPoint,
    pub window: PhaseWindow,
}

/// Phase of the calibration timeline at some instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Phase {
    Settle,
    Target { index: u8 },
    Fit,
    Finished,
}

impl Phase {
    #[inline]
    pub fn target_index(&self) -> Option<u8> {
        match *self {
            Phase::Target { index } => Some(index),
            _ => None,
        }
    }
}

/// Owns the five targets and maps elapsed time onto phases.
#[derive(Clone, Debug)]
pub struct CalibrationSequencer {
    targets: [CalibrationTarget; TARGET_COUNT],
    phase_duration: Duration,
}

impl CalibrationSequencer {
    pub fn new(layout: &ScreenLayout, phase_duration: Duration) -> Result<Self, SessionConfigError> {
        if phase_duration.is_zero() || !timeline_fits(phase_duration) {
            return Err(SessionConfigError::InvalidPhaseDuration(
                phase_duration.as_secs_f64(),
            ));
        }
        layout.validate()?;

        let positions = layout.target_positions();
        let targets = std::array::from_fn(|i| {
            let k = i as u32 + 1;
            CalibrationTarget {
                index: k as u8,
                position: positions[i],
                window: PhaseWindow {
                    start: phase_duration * k,
                    end: phase_duration * (k + 1),
                },
            }
        });

        Ok(Self {
            targets,
            phase_duration,
        })
    }

    #[inline]
    pub fn targets(&self) -> &[CalibrationTarget; TARGET_COUNT] {
        &self.targets
    }

    /// Target by 1-based index.
    pub fn target(&self, index: u8) -> Option<&CalibrationTarget> {
        let i = usize::from(index).checked_sub(1)?;
        self.targets.get(i)
    }

    #[inline]
    pub fn phase_duration(&self) -> Duration {
        self.phase_duration
    }

    pub fn fit_window(&self) -> PhaseWindow {
        let k = FIT_PHASE as u32;
        PhaseWindow {
            start: self.phase_duration * k,
            end: self.phase_duration * (k + 1),
        }
    }

    /// Phase at `elapsed` time since launch.
    pub fn phase_at(&self, elapsed: Duration) -> Phase {
        let k = elapsed.as_nanos() / self.phase_duration.as_nanos();
        match k {
            0 => Phase::Settle,
            k if k < FIT_PHASE => Phase::Target { index: k as u8 },
            FIT_PHASE => Phase::Fit,
            _ => Phase::Finished,
        }
    }

    /// Phase at `now` for a session launched at `launch`.
    ///
    /// `now` before `launch` counts as settle time.
    #[inline]
    pub fn phase(&self, launch: Duration, now: Duration) -> Phase {
        self.phase_at(now.saturating_sub(launch))
    }

    pub fn active_target(&self, launch: Duration, now: Duration) -> Option<&CalibrationTarget> {
        self.phase(launch, now)
            .target_index()
            .and_then(|index| self.target(index))
    }
}
