use std::time::Duration;

use gaze_calib_core::{Eye, PupilPoint};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::error::{ResetReason, SessionConfigError};
use super::params::SessionParams;
use super::result::{TickInput, TickOutput};
use super::state::{CalibrationState, SessionState};
use crate::fitter::MappingFitter;
use crate::sequencer::{CalibrationSequencer, Phase};

/// Drives a [`SessionState`] through
/// `Uncalibrated -> Collecting -> Fitting -> Tracking`.
///
/// The controller itself is immutable configuration; all mutable data is in
/// the session passed to [`tick`](Self::tick).
#[derive(Clone, Debug)]
pub struct CalibrationController {
    sequencer: CalibrationSequencer,
    fitter: MappingFitter,
    eye: Eye,
}

impl CalibrationController {
    pub fn new(params: &SessionParams) -> Result<Self, SessionConfigError> {
        let sequencer = CalibrationSequencer::new(&params.layout, params.phase_duration()?)?;
        let fitter = MappingFitter::new(params.regression()?);
        Ok(Self {
            sequencer,
            fitter,
            eye: params.eye,
        })
    }

    #[inline]
    pub fn sequencer(&self) -> &CalibrationSequencer {
        &self.sequencer
    }

    #[inline]
    pub fn eye(&self) -> Eye {
        self.eye
    }

    /// Fresh session launched at `now`.
    pub fn start(&self, now: Duration) -> SessionState {
        log::debug!("calibration session started at {:.3}s", now.as_secs_f64());
        SessionState::new(now)
    }

    /// Advance the session by one frame.
    ///
    /// Order within a tick: apply a requested recalibration, check tracking
    /// integrity, evaluate the phase against the (possibly new) launch time,
    /// capture or fit, then estimate if tracking.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, session, input), fields(now_s = input.now.as_secs_f64()))
    )]
    pub fn tick(&self, session: &mut SessionState, input: &TickInput) -> TickOutput {
        let now = input.now;
        let reading = input.pupils.eye(self.eye);
        let mut reset = None;

        if input.recalibrate {
            reset = Some(self.recalibrate(session, now, ResetReason::Requested));
        }

        if session.state() == CalibrationState::Tracking && session.samples().complete().is_none()
        {
            reset = Some(self.recalibrate(session, now, ResetReason::IntegrityLost));
        }

        if session.state() != CalibrationState::Tracking {
            let elapsed = now.saturating_sub(session.launch_time());
            match self.sequencer.phase_at(elapsed) {
                Phase::Settle => {}
                Phase::Target { index } => self.capture(session, index, reading),
                Phase::Fit => {
                    if let Err(reason) = self.fit(session) {
                        reset = Some(self.recalibrate(session, now, reason));
                    }
                }
                Phase::Finished => {
                    let reason = ResetReason::FitWindowMissed {
                        elapsed_s: elapsed.as_secs_f64(),
                    };
                    reset = Some(self.recalibrate(session, now, reason));
                }
            }
        }

        let gaze = session
            .tracking_parts()
            .and_then(|(model, estimator)| estimator.estimate(model, reading));

        let phase = self.sequencer.phase(session.launch_time(), now);
        let active = phase
            .target_index()
            .and_then(|index| self.sequencer.target(index));

        TickOutput {
            now_s: now.as_secs_f64(),
            state: session.state(),
            phase,
            active_target: active.map(|t| t.index),
            target_position: active.map(|t| t.position),
            gaze,
            reset,
        }
    }

    /// Send the session back to `Uncalibrated` and restart the timeline at `now`.
    pub fn recalibrate(
        &self,
        session: &mut SessionState,
        now: Duration,
        reason: ResetReason,
    ) -> ResetReason {
        match &reason {
            ResetReason::Requested => log::info!("recalibrating: {reason}"),
            _ => log::warn!("recalibrating: {reason}"),
        }
        log::debug!(
            "{:?} -> {:?} at {:.3}s",
            session.state(),
            CalibrationState::Uncalibrated,
            now.as_secs_f64()
        );
        session.reset(now);
        reason
    }

    fn capture(&self, session: &mut SessionState, index: u8, reading: Option<PupilPoint>) {
        if session.state() == CalibrationState::Uncalibrated {
            log::debug!(
                "{:?} -> {:?}",
                CalibrationState::Uncalibrated,
                CalibrationState::Collecting
            );
            session.begin_collecting();
        }
        if session.samples().pupil(index).is_none() && reading.is_some() {
            log::debug!("target {index}: pupil sample captured");
        }
        session.samples_mut().record(index, reading);
    }

    /// Fit the mapping from the collected samples and start tracking.
    ///
    /// Runs at most once per attempt: a successful fit leaves `Collecting`,
    /// and a failure resets the timeline.
    fn fit(&self, session: &mut SessionState) -> Result<(), ResetReason> {
        let Some(pupils) = session.samples().complete() else {
            return Err(ResetReason::IncompleteCalibration {
                missing: session.samples().missing(),
            });
        };

        log::debug!("{:?} -> {:?}", session.state(), CalibrationState::Fitting);
        session.begin_fitting();

        let fit = self
            .fitter
            .fit(self.sequencer.targets(), &pupils)
            .map_err(|err| ResetReason::FitFailed {
                message: err.to_string(),
            })?;

        log::debug!("{:?} -> {:?}", CalibrationState::Fitting, CalibrationState::Tracking);
        session.start_tracking(fit.model);
        Ok(())
    }
}
