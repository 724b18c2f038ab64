//! Event loop seam: one driver turns terminal input and the passage of
//! wall-clock time into session advances.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::session::WorkoutSession;

/// Nominal cadence of the rowing clock. The session only ever sees whole
/// seconds; reconciliation corrects for drift and gaps.
pub const TICK_RATE_MS: u64 = 1000;

#[derive(Clone, Debug)]
pub enum SessionEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize).
pub trait SessionEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<SessionEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(SessionEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(SessionEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for headless tests
pub struct TestEventSource {
    rx: Receiver<SessionEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<SessionEvent>) -> Self {
        Self { rx }
    }
}

impl SessionEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Drives a session at the fixed rowing cadence: terminal events pass
/// through untouched, and a quiet cadence window becomes one second of
/// session time.
pub struct Runner<E: SessionEventSource> {
    events: E,
    cadence: Duration,
}

impl<E: SessionEventSource> Runner<E> {
    pub fn new(events: E) -> Self {
        Self {
            events,
            cadence: Duration::from_millis(TICK_RATE_MS),
        }
    }

    /// Compressed cadence for headless tests.
    pub fn with_cadence(events: E, cadence: Duration) -> Self {
        Self { events, cadence }
    }

    /// Block for one cadence window and return what happened. Input wins;
    /// otherwise the elapsed window itself is the event and the session
    /// advances one second (a no-op while idle or paused).
    pub fn step(&self, session: &mut WorkoutSession) -> SessionEvent {
        match self.events.recv_timeout(self.cadence) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                session.tick();
                SessionEvent::Tick
            }
        }
    }
}
