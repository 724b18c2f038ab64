//! Snapshot reconciliation: replays the wall-clock time a suspended
//! process missed, in one bulk step that is exactly equivalent to having
//! called `tick()` once per missed second.
//!
//! Runs once at startup when a live snapshot exists. The interesting case
//! is a gap that spans the warmup boundary: the warmup tail is consumed
//! first and the surplus seconds become main-phase seconds starting from a
//! fresh interval.

use crate::clock::Clock;
use crate::distance::millimeters_per_second;
use crate::interval_clock::IntervalClock;
use crate::persist::{PersistenceGateway, Snapshot};
use crate::session::{Phase, WorkoutSession};
use std::sync::Arc;

/// Outcome of reconciliation: the rebuilt session, and whether the driver
/// should resume delivering ticks (a paused snapshot stays paused).
#[derive(Debug)]
pub struct Restored {
    pub session: WorkoutSession,
    pub resume_ticking: bool,
}

/// Rebuild in-memory state from `snapshot` as of the injected clock's now.
/// Returns `None` for snapshots that do not describe a live session.
/// Negative gaps (clock skew) replay nothing.
pub fn reconcile(
    snapshot: Snapshot,
    gateway: Box<dyn PersistenceGateway>,
    clock: Arc<dyn Clock>,
) -> Option<Restored> {
    if !snapshot.is_active || snapshot.phase == Phase::Idle {
        return None;
    }

    let delta_ms = clock.now_ms() - snapshot.last_tick;
    let seconds_passed = if delta_ms > 0 {
        (delta_ms / 1000) as u64
    } else {
        0
    };

    let mut session = WorkoutSession::new(gateway, clock);
    session.interval = snapshot.interval;
    session.pace = snapshot.pace;
    session.journey_id = snapshot.journey_id.clone();
    session.journey_progress_mm = snapshot.journey_progress_mm;
    session.scenery = snapshot.scenery.clone();
    session.session_distance_mm = snapshot.session_distance_mm;
    session.elapsed_time = snapshot.elapsed_time;
    session.interval_countdown = snapshot.interval_countdown;
    session.intervals_completed = snapshot.intervals_completed;
    session.warmup_countdown = snapshot.warmup_countdown;
    session.phase = snapshot.phase;
    session.paused = snapshot.paused;

    let period = i64::from(snapshot.interval) * 60;
    let step = millimeters_per_second(snapshot.pace);

    if snapshot.paused {
        // Paused time is not rowing time: restore verbatim
    } else if snapshot.phase == Phase::Warmup {
        let warmup_remaining = i64::from(snapshot.warmup_countdown) - seconds_passed as i64;
        if warmup_remaining > 0 {
            session.warmup_countdown = warmup_remaining as u32;
        } else {
            // Warmup completed while away; the surplus counts as main-phase
            // seconds from a zero baseline
            let surplus = (-warmup_remaining) as u64;
            let mut interval_clock = IntervalClock::new(period);
            let rollovers = interval_clock.advance(surplus);

            session.phase = Phase::Active;
            session.warmup_countdown = 0;
            session.elapsed_time = surplus;
            session.interval_countdown = interval_clock.countdown;
            session.intervals_completed = rollovers as u32;
            session.session_distance_mm += step * surplus;
            session.journey_progress_mm += step * surplus;
        }
    } else {
        let mut interval_clock = IntervalClock::resume(snapshot.interval_countdown, period);
        let rollovers = interval_clock.advance(seconds_passed);

        session.elapsed_time += seconds_passed;
        session.interval_countdown = interval_clock.countdown;
        session.intervals_completed += rollovers as u32;
        session.session_distance_mm += step * seconds_passed;
        session.journey_progress_mm += step * seconds_passed;
    }

    let resume_ticking = !session.paused;
    // Re-stamp last_tick so the replayed stretch is not counted twice
    session.persist_snapshot();
    session.persist_journey();

    Some(Restored {
        session,
        resume_ticking,
    })
}
