//! Workout session state machine.
//!
//! A session moves Idle -> Warmup -> Active and back to Idle on `end`;
//! Warmup and Active carry a paused sub-flag. All mutation happens through
//! the operations below, strictly sequentially; the driver is the only
//! recurring trigger and calls `tick` at most once per nominal second.
//! Every mutating operation and every tick persists a snapshot through the
//! gateway; a paused or idle session never ticks, so stopping the tick
//! source is synchronous from the caller's point of view.

use crate::clock::Clock;
use crate::distance::{millimeters_per_second, mm_to_meters};
use crate::interval_clock::IntervalClock;
use crate::journey::{DEFAULT_JOURNEY_ID, DEFAULT_SCENERY_ID};
use crate::persist::{JourneyRecord, PersistenceGateway, Snapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Warmup length before the main effort begins.
pub const WARMUP_SECS: u32 = 120;

/// Upper bound for pace (strokes/minute) and interval (minutes).
pub const MAX_PACE: f64 = 120.0;
pub const MAX_INTERVAL_MINUTES: u32 = 120;

pub const DEFAULT_INTERVAL_MINUTES: u32 = 5;
pub const DEFAULT_PACE: f64 = 24.0;

/// Coarse session stage. `Ended` is transient and collapses straight back
/// to `Idle`, so it never persists as its own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Warmup,
    Active,
}

/// Row appended to the history log when a session with main-phase time ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub ended_at_ms: i64,
    pub elapsed_time: u64,
    pub intervals_completed: u32,
    pub distance_meters: f64,
    pub journey_id: String,
}

pub struct WorkoutSession {
    pub phase: Phase,
    pub paused: bool,
    /// Main-phase seconds only; warmup does not count.
    pub elapsed_time: u64,
    /// Interval length in minutes, 1..=120.
    pub interval: u32,
    /// Seconds left in the current interval; <=0 only transiently inside a
    /// tick before the rollover resets it.
    pub interval_countdown: i64,
    pub intervals_completed: u32,
    pub warmup_countdown: u32,
    /// Strokes per minute, accepted range (0, 120].
    pub pace: f64,
    pub session_distance_mm: u64,
    pub journey_id: String,
    pub journey_progress_mm: u64,
    pub scenery: String,
    gateway: Box<dyn PersistenceGateway>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for WorkoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkoutSession")
            .field("phase", &self.phase)
            .field("paused", &self.paused)
            .field("elapsed_time", &self.elapsed_time)
            .field("interval", &self.interval)
            .field("interval_countdown", &self.interval_countdown)
            .field("intervals_completed", &self.intervals_completed)
            .field("warmup_countdown", &self.warmup_countdown)
            .field("pace", &self.pace)
            .field("session_distance_mm", &self.session_distance_mm)
            .field("journey_id", &self.journey_id)
            .field("journey_progress_mm", &self.journey_progress_mm)
            .field("scenery", &self.scenery)
            .finish()
    }
}

impl WorkoutSession {
    /// Idle session. Journey id and progress are seeded from the retained
    /// journey record when one exists, so a new session on the same route
    /// picks up where the last one left off.
    pub fn new(gateway: Box<dyn PersistenceGateway>, clock: Arc<dyn Clock>) -> Self {
        let (journey_id, journey_progress_mm) = match gateway.load_journey() {
            Some(r) => (r.journey_id, r.progress_mm),
            None => (DEFAULT_JOURNEY_ID.to_string(), 0),
        };

        Self {
            phase: Phase::Idle,
            paused: false,
            elapsed_time: 0,
            interval: DEFAULT_INTERVAL_MINUTES,
            interval_countdown: 0,
            intervals_completed: 0,
            warmup_countdown: 0,
            pace: DEFAULT_PACE,
            session_distance_mm: 0,
            journey_id,
            journey_progress_mm,
            scenery: DEFAULT_SCENERY_ID.to_string(),
            gateway,
            clock,
        }
    }

    /// Begin a session: enters warmup, paused, awaiting an explicit resume.
    /// Only valid from Idle. Switching journey resets its progress;
    /// restarting the same journey carries progress over.
    pub fn start(&mut self, interval: u32, pace: f64, journey_id: Option<&str>) {
        if self.phase != Phase::Idle {
            return;
        }

        if let Some(id) = journey_id {
            if id != self.journey_id {
                self.journey_id = id.to_string();
                self.journey_progress_mm = 0;
            }
        }

        self.interval = interval;
        self.pace = pace;
        self.elapsed_time = 0;
        self.intervals_completed = 0;
        self.session_distance_mm = 0;
        // Deferred until warmup completes
        self.interval_countdown = 0;
        self.warmup_countdown = WARMUP_SECS;
        self.phase = Phase::Warmup;
        self.paused = true;

        self.persist_snapshot();
        self.persist_journey();
    }

    pub fn pause(&mut self) {
        if !self.is_ticking() {
            return;
        }
        self.paused = true;
        self.persist_snapshot();
    }

    pub fn resume(&mut self) {
        if !self.paused || self.phase == Phase::Idle {
            return;
        }
        self.paused = false;
        // Re-stamp last_tick so a crash right after resume does not replay
        // the paused stretch as rowing time
        self.persist_snapshot();
    }

    /// End from any phase: clears the snapshot, retains the journey record,
    /// collapses to Idle. Returns a summary when any main-phase time was
    /// rowed, for the history log. Idempotent.
    pub fn end(&mut self) -> Option<SessionSummary> {
        if self.phase == Phase::Idle {
            return None;
        }

        let summary = (self.elapsed_time > 0).then(|| SessionSummary {
            ended_at_ms: self.clock.now_ms(),
            elapsed_time: self.elapsed_time,
            intervals_completed: self.intervals_completed,
            distance_meters: self.session_distance(),
            journey_id: self.journey_id.clone(),
        });

        self.phase = Phase::Idle;
        self.paused = false;
        self.elapsed_time = 0;
        self.interval_countdown = 0;
        self.intervals_completed = 0;
        self.warmup_countdown = 0;
        self.session_distance_mm = 0;

        self.gateway.clear_snapshot();
        self.persist_journey();

        summary
    }

    /// Accepted only inside (0, 120]; anything else is a silent no-op.
    pub fn update_pace(&mut self, new_pace: f64) {
        if !(new_pace > 0.0 && new_pace <= MAX_PACE) {
            return;
        }
        self.pace = new_pace;
        self.persist_snapshot();
    }

    /// Accepted only inside (0, 120] minutes. Resets the running countdown
    /// to the new full length immediately, even mid-interval.
    pub fn update_interval(&mut self, new_interval: u32) {
        if new_interval == 0 || new_interval > MAX_INTERVAL_MINUTES {
            return;
        }
        self.interval = new_interval;
        self.interval_countdown = i64::from(new_interval) * 60;
        self.persist_snapshot();
    }

    pub fn update_scenery(&mut self, scenery: &str) {
        self.scenery = scenery.to_string();
        self.persist_snapshot();
    }

    /// Whether the driver should be delivering per-second ticks.
    pub fn is_ticking(&self) -> bool {
        !self.paused && self.phase != Phase::Idle
    }

    /// One wall-clock second. No-op while paused or idle.
    pub fn tick(&mut self) {
        if !self.is_ticking() {
            return;
        }

        match self.phase {
            Phase::Idle => {}
            Phase::Warmup => {
                self.warmup_countdown = self.warmup_countdown.saturating_sub(1);
                if self.warmup_countdown == 0 {
                    self.phase = Phase::Active;
                    self.interval_countdown = i64::from(self.interval) * 60;
                }
                self.persist_snapshot();
            }
            Phase::Active => {
                self.elapsed_time += 1;

                let mut clock =
                    IntervalClock::resume(self.interval_countdown, i64::from(self.interval) * 60);
                let rollovers = clock.advance(1);
                self.interval_countdown = clock.countdown;
                self.intervals_completed += rollovers as u32;

                let step = millimeters_per_second(self.pace);
                self.session_distance_mm += step;
                self.journey_progress_mm += step;

                self.persist_snapshot();
                self.persist_journey();
            }
        }
    }

    pub fn session_distance(&self) -> f64 {
        mm_to_meters(self.session_distance_mm)
    }

    pub fn journey_progress(&self) -> f64 {
        mm_to_meters(self.journey_progress_mm)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            is_active: self.phase != Phase::Idle,
            phase: self.phase,
            paused: self.paused,
            elapsed_time: self.elapsed_time,
            interval: self.interval,
            interval_countdown: self.interval_countdown,
            intervals_completed: self.intervals_completed,
            warmup_countdown: self.warmup_countdown,
            pace: self.pace,
            session_distance_mm: self.session_distance_mm,
            journey_id: self.journey_id.clone(),
            journey_progress_mm: self.journey_progress_mm,
            scenery: self.scenery.clone(),
            last_tick: self.clock.now_ms(),
        }
    }

    pub fn persist_snapshot(&self) {
        self.gateway.save_snapshot(&self.snapshot());
    }

    pub(crate) fn persist_journey(&self) {
        self.gateway.save_journey(&JourneyRecord {
            journey_id: self.journey_id.clone(),
            progress_mm: self.journey_progress_mm,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::persist::MemoryGateway;

    fn test_session() -> (WorkoutSession, MemoryGateway, Arc<FixedClock>) {
        let gateway = MemoryGateway::new();
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let session = WorkoutSession::new(Box::new(gateway.clone()), clock.clone());
        (session, gateway, clock)
    }

    fn run_ticks(session: &mut WorkoutSession, n: u32) {
        for _ in 0..n {
            session.tick();
        }
    }

    #[test]
    fn test_new_session_is_idle_with_defaults() {
        let (session, _, _) = test_session();
        assert_eq!(session.phase, Phase::Idle);
        assert!(!session.paused);
        assert_eq!(session.interval, 5);
        assert_eq!(session.pace, 24.0);
        assert_eq!(session.journey_id, "sf-to-alcatraz");
        assert_eq!(session.scenery, "mountain-lake");
        assert_eq!(session.session_distance(), 0.0);
    }

    #[test]
    fn test_start_enters_paused_warmup() {
        let (mut session, gateway, _) = test_session();
        session.start(5, 24.0, None);

        assert_eq!(session.phase, Phase::Warmup);
        assert!(session.paused);
        assert_eq!(session.warmup_countdown, WARMUP_SECS);
        assert_eq!(session.interval_countdown, 0);
        assert_eq!(session.elapsed_time, 0);
        assert!(!session.is_ticking());

        let snap = gateway.load_snapshot().unwrap();
        assert!(snap.is_active);
        assert!(snap.paused);
    }

    #[test]
    fn test_start_ignored_mid_session() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, None);
        session.resume();
        run_ticks(&mut session, 10);

        session.start(3, 30.0, None);
        assert_eq!(session.interval, 5);
        assert_eq!(session.warmup_countdown, WARMUP_SECS - 10);
    }

    #[test]
    fn test_tick_noop_while_paused() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, None);

        run_ticks(&mut session, 30);
        assert_eq!(session.warmup_countdown, WARMUP_SECS);
    }

    #[test]
    fn test_warmup_completes_into_main_phase() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, None);
        session.resume();

        run_ticks(&mut session, 119);
        assert_eq!(session.phase, Phase::Warmup);
        assert_eq!(session.warmup_countdown, 1);

        session.tick();
        assert_eq!(session.phase, Phase::Active);
        assert_eq!(session.warmup_countdown, 0);
        assert_eq!(session.interval_countdown, 300);
        assert_eq!(session.elapsed_time, 0);
        assert_eq!(session.session_distance(), 0.0);
    }

    #[test]
    fn test_concrete_scenario_five_minute_intervals() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, None);
        assert_eq!(session.phase, Phase::Warmup);
        assert!(session.paused);
        assert_eq!(session.warmup_countdown, 120);

        session.resume();
        run_ticks(&mut session, 120);
        assert_eq!(session.phase, Phase::Active);
        assert_eq!(session.interval_countdown, 300);
        assert_eq!(session.elapsed_time, 0);
        assert_eq!(session.session_distance(), 0.0);

        run_ticks(&mut session, 60);
        assert_eq!(session.elapsed_time, 60);
        assert_eq!(session.interval_countdown, 240);
        // 60 s at 24 spm * 10 m / 60 = 240 m
        assert_eq!(session.session_distance(), 240.0);
        assert_eq!(session.journey_progress(), 240.0);
    }

    #[test]
    fn test_interval_rollover_counts_once() {
        let (mut session, _, _) = test_session();
        session.start(1, 24.0, None);
        session.resume();
        run_ticks(&mut session, 120); // warmup

        run_ticks(&mut session, 59);
        assert_eq!(session.intervals_completed, 0);
        assert_eq!(session.interval_countdown, 1);

        session.tick();
        assert_eq!(session.intervals_completed, 1);
        assert_eq!(session.interval_countdown, 60);

        run_ticks(&mut session, 60);
        assert_eq!(session.intervals_completed, 2);
    }

    #[test]
    fn test_pace_bounds() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, None);

        session.update_pace(0.0);
        assert_eq!(session.pace, 24.0);
        session.update_pace(121.0);
        assert_eq!(session.pace, 24.0);
        session.update_pace(-5.0);
        assert_eq!(session.pace, 24.0);

        session.update_pace(30.0);
        assert_eq!(session.pace, 30.0);
        session.update_pace(120.0);
        assert_eq!(session.pace, 120.0);
    }

    #[test]
    fn test_pace_change_does_not_reset_countdown() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, None);
        session.resume();
        run_ticks(&mut session, 120 + 30);
        assert_eq!(session.interval_countdown, 270);

        session.update_pace(28.0);
        assert_eq!(session.interval_countdown, 270);
    }

    #[test]
    fn test_interval_change_resets_countdown_mid_interval() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, None);
        session.resume();
        run_ticks(&mut session, 120 + 250);
        assert_eq!(session.interval_countdown, 50);
        let completed = session.intervals_completed;

        session.update_interval(3);
        assert_eq!(session.interval, 3);
        assert_eq!(session.interval_countdown, 180);
        assert_eq!(session.intervals_completed, completed);
    }

    #[test]
    fn test_interval_bounds() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, None);
        session.update_interval(0);
        assert_eq!(session.interval, 5);
        session.update_interval(121);
        assert_eq!(session.interval, 5);
    }

    #[test]
    fn test_scenery_is_unvalidated() {
        let (mut session, _, _) = test_session();
        session.update_scenery("underwater-volcano");
        assert_eq!(session.scenery, "underwater-volcano");
    }

    #[test]
    fn test_pause_resume_guards() {
        let (mut session, _, _) = test_session();

        // Idle: both are no-ops
        session.pause();
        session.resume();
        assert_eq!(session.phase, Phase::Idle);
        assert!(!session.paused);

        session.start(5, 24.0, None);
        session.resume();
        assert!(session.is_ticking());

        session.pause();
        assert!(session.paused);
        session.pause();
        assert!(session.paused);

        session.resume();
        assert!(session.is_ticking());
    }

    #[test]
    fn test_end_is_idempotent_and_clears_snapshot() {
        let (mut session, gateway, _) = test_session();
        session.start(5, 24.0, None);
        session.resume();
        run_ticks(&mut session, 120 + 45);
        assert!(gateway.load_snapshot().is_some());

        let summary = session.end().unwrap();
        assert_eq!(summary.elapsed_time, 45);
        assert_eq!(summary.distance_meters, 180.0);
        assert_eq!(summary.journey_id, "sf-to-alcatraz");

        assert_eq!(session.phase, Phase::Idle);
        assert!(gateway.load_snapshot().is_none());
        assert!(gateway.load_journey().is_some());

        assert!(session.end().is_none());
        assert_eq!(session.phase, Phase::Idle);
        assert!(gateway.load_snapshot().is_none());
    }

    #[test]
    fn test_end_during_warmup_yields_no_summary() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, None);
        session.resume();
        run_ticks(&mut session, 30);
        assert!(session.end().is_none());
    }

    #[test]
    fn test_journey_progress_survives_end_and_seeds_next_session() {
        let (mut session, gateway, clock) = test_session();
        session.start(5, 24.0, Some("thames-marathon"));
        session.resume();
        run_ticks(&mut session, 120 + 100);
        assert_eq!(session.journey_progress(), 400.0);
        session.end();

        let next = WorkoutSession::new(Box::new(gateway.clone()), clock.clone());
        assert_eq!(next.journey_id, "thames-marathon");
        assert_eq!(next.journey_progress(), 400.0);
    }

    #[test]
    fn test_switching_journey_resets_progress() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, Some("thames-marathon"));
        session.resume();
        run_ticks(&mut session, 120 + 10);
        assert!(session.journey_progress() > 0.0);
        session.end();

        session.start(5, 24.0, Some("arctic-passage"));
        assert_eq!(session.journey_id, "arctic-passage");
        assert_eq!(session.journey_progress(), 0.0);
    }

    #[test]
    fn test_same_journey_restart_carries_progress() {
        let (mut session, _, _) = test_session();
        session.start(5, 24.0, Some("thames-marathon"));
        session.resume();
        run_ticks(&mut session, 120 + 10);
        let progress = session.journey_progress();
        session.end();

        session.start(5, 24.0, Some("thames-marathon"));
        assert_eq!(session.journey_progress(), progress);
    }

    #[test]
    fn test_snapshot_carries_last_tick() {
        let (mut session, gateway, clock) = test_session();
        session.start(5, 24.0, None);
        session.resume();
        clock.advance_secs(7);
        session.tick();

        let snap = gateway.load_snapshot().unwrap();
        assert_eq!(snap.last_tick, 1_700_000_000_000 + 7_000);
        assert_eq!(snap.phase, Phase::Warmup);
        assert_eq!(snap.warmup_countdown, WARMUP_SECS - 1);
    }
}
