//! Offline replay of recorded pupil traces.

use std::time::Duration;

use crate::clock::ManualClock;
use crate::controller::{SessionParams, TickOutput};
use crate::io::{ReplayReport, ReplaySummary, SessionIoError, TraceEntry};
use crate::tracker::GazeTracker;

/// Run `trace` through a fresh session launched at the first entry's time.
///
/// Timestamps must be finite, non-negative and non-decreasing.
pub fn replay_trace(
    params: &SessionParams,
    trace: &[TraceEntry],
) -> Result<ReplayReport, SessionIoError> {
    let start = trace.first().map_or(Ok(Duration::ZERO), |e| to_duration(0, e.t))?;
    let mut tracker = GazeTracker::new(params, ManualClock::new(start))?;

    let mut ticks: Vec<TickOutput> = Vec::with_capacity(trace.len());
    let mut prev = start;
    for (index, entry) in trace.iter().enumerate() {
        let now = to_duration(index, entry.t)?;
        if now < prev {
            return Err(SessionIoError::InvalidTimestamp { index, t: entry.t });
        }
        prev = now;

        tracker.clock().set(now);
        ticks.push(tracker.step(entry.observation(), entry.recalibrate));
    }

    let session = tracker.session();
    log::info!(
        "replayed {} ticks: {} fits, {} resets, final state {:?}",
        ticks.len(),
        session.fit_count(),
        session.reset_count(),
        session.state()
    );

    Ok(ReplayReport {
        params: params.clone(),
        summary: ReplaySummary {
            ticks: ticks.len(),
            fits: session.fit_count(),
            resets: session.reset_count(),
            final_state: session.state(),
        },
        ticks,
    })
}

fn to_duration(index: usize, t: f64) -> Result<Duration, SessionIoError> {
    if !t.is_finite() || t < 0.0 {
        return Err(SessionIoError::InvalidTimestamp { index, t });
    }
    Duration::try_from_secs_f64(t).map_err(|_| SessionIoError::InvalidTimestamp { index, t })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalibrationState;
    use gaze_calib_core::PupilPoint;

    fn entry(t: f64, right: Option<(f64, f64)>) -> TraceEntry {
        TraceEntry {
            t,
            left: None,
            right: right.map(|(x, y)| PupilPoint::new(x, y)),
            recalibrate: false,
        }
    }

    #[test]
    fn replay_reaches_tracking() {
        let trace = vec![
            entry(0.0, None),
            entry(3.5, Some((100.0, 100.0))),
            entry(6.5, Some((200.0, 100.0))),
            entry(9.5, Some((200.0, 200.0))),
            entry(12.5, Some((100.0, 200.0))),
            entry(15.5, Some((150.0, 150.0))),
            entry(18.0, Some((150.0, 150.0))),
        ];
        let report = replay_trace(&SessionParams::default(), &trace).expect("replay");
        assert_eq!(report.summary.ticks, 7);
        assert_eq!(report.summary.fits, 1);
        assert_eq!(report.summary.resets, 0);
        assert_eq!(report.summary.final_state, CalibrationState::Tracking);
    }

    #[test]
    fn timestamps_going_backwards_are_rejected() {
        let trace = vec![entry(1.0, None), entry(0.5, None)];
        let err = replay_trace(&SessionParams::default(), &trace).unwrap_err();
        assert!(matches!(err, SessionIoError::InvalidTimestamp { index: 1, .. }));
    }

    #[test]
    fn negative_timestamp_is_rejected() {
        let trace = vec![entry(-1.0, None)];
        assert!(matches!(
            replay_trace(&SessionParams::default(), &trace),
            Err(SessionIoError::InvalidTimestamp { index: 0, .. })
        ));
    }

    #[test]
    fn empty_trace_gives_empty_report() {
        let report = replay_trace(&SessionParams::default(), &[]).expect("replay");
        assert_eq!(report.summary.ticks, 0);
        assert_eq!(report.summary.final_state, CalibrationState::Uncalibrated);
    }
}
