//! Convenience driver bundling controller, session and clock.

use gaze_calib_core::{PupilObservation, PupilSource};

use crate::clock::Clock;
use crate::controller::{
    CalibrationController, ResetReason, SessionConfigError, SessionParams, SessionState,
    TickInput, TickOutput,
};

/// Owns a controller, its session and a time source.
///
/// Drivers that already timestamp their frames can call
/// [`CalibrationController::tick`] directly instead.
pub struct GazeTracker<C: Clock> {
    controller: CalibrationController,
    session: SessionState,
    clock: C,
}

impl<C: Clock> GazeTracker<C> {
    pub fn new(params: &SessionParams, clock: C) -> Result<Self, SessionConfigError> {
        let controller = CalibrationController::new(params)?;
        let session = controller.start(clock.now());
        Ok(Self {
            controller,
            session,
            clock,
        })
    }

    /// Tick with an already located pupil observation.
    pub fn step(&mut self, pupils: PupilObservation, recalibrate: bool) -> TickOutput {
        let input = TickInput::new(self.clock.now(), pupils).with_recalibrate(recalibrate);
        self.controller.tick(&mut self.session, &input)
    }

    /// Locate the pupils in `frame` with `source`, then tick.
    pub fn process_frame<S: PupilSource>(
        &mut self,
        source: &mut S,
        frame: &S::Frame,
        recalibrate: bool,
    ) -> TickOutput {
        let pupils = source.locate(frame);
        self.step(pupils, recalibrate)
    }

    /// Restart calibration immediately, outside of a tick.
    pub fn recalibrate(&mut self) -> ResetReason {
        let now = self.clock.now();
        self.controller
            .recalibrate(&mut self.session, now, ResetReason::Requested)
    }

    pub fn controller(&self) -> &CalibrationController {
        &self.controller
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalibrationState, ManualClock};
    use std::time::Duration;

    /// Detector stand-in whose "frames" already are observations.
    struct Passthrough;

    impl PupilSource for Passthrough {
        type Frame = PupilObservation;

        fn locate(&mut self, frame: &PupilObservation) -> PupilObservation {
            *frame
        }
    }

    #[test]
    fn tracker_uses_clock_for_timestamps() {
        let clock = ManualClock::new(Duration::from_secs(100));
        let mut tracker = GazeTracker::new(&SessionParams::default(), clock).expect("tracker");
        assert_eq!(tracker.session().launch_time(), Duration::from_secs(100));

        tracker.clock().advance(Duration::from_secs(4));
        let out = tracker.process_frame(&mut Passthrough, &PupilObservation::right(3.0, 4.0), false);
        assert_eq!(out.active_target, Some(1));
        assert_eq!(out.state, CalibrationState::Collecting);
    }

    #[test]
    fn recalibrate_restarts_at_current_time() {
        let clock = ManualClock::new(Duration::ZERO);
        let mut tracker = GazeTracker::new(&SessionParams::default(), clock).expect("tracker");
        tracker.clock().set(Duration::from_secs(5));
        tracker.step(PupilObservation::right(1.0, 1.0), false);

        tracker.clock().set(Duration::from_secs(8));
        assert_eq!(tracker.recalibrate(), ResetReason::Requested);
        assert_eq!(tracker.session().launch_time(), Duration::from_secs(8));
        assert_eq!(tracker.session().state(), CalibrationState::Uncalibrated);
    }
}
