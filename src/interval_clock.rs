//! Repeating countdown with rollover counting.
//!
//! The same primitive serves live per-second ticking (`advance(1)`) and
//! bulk replay after a suspension (`advance(n)` for arbitrarily large `n`).
//! A countdown that reaches exactly zero rolls over in that same step, so
//! no zero-duration interval is ever observable.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalClock {
    /// Seconds left in the current interval. May dip to or below zero only
    /// inside `advance`, never after it returns.
    pub countdown: i64,
    /// Full interval length in seconds.
    pub period: i64,
}

impl IntervalClock {
    /// Fresh clock with a full period on it.
    pub fn new(period: i64) -> Self {
        debug_assert!(period > 0);
        Self {
            countdown: period,
            period,
        }
    }

    /// Clock resumed from a persisted countdown value.
    pub fn resume(countdown: i64, period: i64) -> Self {
        debug_assert!(period > 0);
        Self { countdown, period }
    }

    /// Decrement by `n` seconds, returning how many full intervals were
    /// completed. Closed-form: the decrement may cross zero several times;
    /// each crossing counts once, and the countdown lands on
    /// `period - (overshoot % period)`.
    pub fn advance(&mut self, n: u64) -> u64 {
        self.countdown -= n as i64;
        if self.countdown > 0 {
            return 0;
        }
        let overshoot = -self.countdown;
        let rollovers = overshoot as u64 / self.period as u64 + 1;
        self.countdown = self.period - overshoot % self.period;
        rollovers
    }
}
