//! Closed-vocabulary command interpreter.
//!
//! Classifies a final transcript (voice or typed) into one of the session
//! operations and dispatches it. Anything that does not match produces no
//! command and no error; validation beyond phrase shape is left to the
//! session itself.

use crate::journey::scenery_for_phrase;
use crate::session::{SessionSummary, WorkoutSession};
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    End,
    SetPace(u32),
    SetInterval(u32),
    SetScenery(String),
}

static END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(end|stop|finish)\b").unwrap());
static PAUSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(pause|hold)\b").unwrap());
static RESUME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(resume|continue)\b|\bkeep\s+going\b").unwrap());
static START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(start|begin)\b").unwrap());
// "set pace to 28", "pace 30", "change pace to 25"
static PACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:set\s+)?(?:change\s+)?pace(?:\s+to)?\s+(\d+)").unwrap());
// "set interval to 3", "interval 5", "change interval to 10"
static INTERVAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:set\s+)?(?:change\s+)?interval(?:\s+to)?\s+(\d+)").unwrap());

fn captured_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Map a transcript onto the command vocabulary. Returns `None` for
/// unrecognized input.
pub fn classify(transcript: &str) -> Option<Command> {
    let text = transcript.to_lowercase();
    let text = text.trim();

    if END_RE.is_match(text) {
        return Some(Command::End);
    }
    if PAUSE_RE.is_match(text) {
        return Some(Command::Pause);
    }
    if RESUME_RE.is_match(text) {
        return Some(Command::Resume);
    }
    if let Some(n) = captured_number(&PACE_RE, text) {
        return Some(Command::SetPace(n));
    }
    if let Some(n) = captured_number(&INTERVAL_RE, text) {
        return Some(Command::SetInterval(n));
    }
    if START_RE.is_match(text) {
        return Some(Command::Start);
    }
    if let Some(id) = scenery_for_phrase(text) {
        return Some(Command::SetScenery(id.to_string()));
    }

    None
}

/// Dispatch a classified command onto the session. `Start` from idle both
/// begins the session and resumes it: the spoken "start" is the explicit
/// go signal, not just the setup step. Returns a summary when an `End`
/// closed out rowed time, so the caller can log it.
pub fn apply(session: &mut WorkoutSession, command: Command) -> Option<SessionSummary> {
    match command {
        Command::Start => {
            let (interval, pace) = (session.interval, session.pace);
            session.start(interval, pace, None);
            session.resume();
            None
        }
        Command::Pause => {
            session.pause();
            None
        }
        Command::Resume => {
            session.resume();
            None
        }
        Command::End => session.end(),
        Command::SetPace(n) => {
            session.update_pace(f64::from(n));
            None
        }
        Command::SetInterval(n) => {
            session.update_interval(n);
            None
        }
        Command::SetScenery(id) => {
            session.update_scenery(&id);
            None
        }
    }
}

/// Convenience for drivers that hold raw transcripts.
pub fn interpret(session: &mut WorkoutSession, transcript: &str) -> Option<SessionSummary> {
    classify(transcript).and_then(|cmd| apply(session, cmd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::persist::MemoryGateway;
    use crate::session::Phase;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn test_session() -> WorkoutSession {
        WorkoutSession::new(
            Box::new(MemoryGateway::new()),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        )
    }

    #[test]
    fn test_end_phrases() {
        assert_eq!(classify("end the workout"), Some(Command::End));
        assert_eq!(classify("please STOP"), Some(Command::End));
        assert_eq!(classify("finish"), Some(Command::End));
    }

    #[test]
    fn test_pause_and_resume_phrases() {
        assert_eq!(classify("pause"), Some(Command::Pause));
        assert_eq!(classify("hold on"), Some(Command::Pause));
        assert_eq!(classify("resume"), Some(Command::Resume));
        assert_eq!(classify("keep going"), Some(Command::Resume));
        assert_eq!(classify("continue rowing"), Some(Command::Resume));
    }

    #[test]
    fn test_start_phrases() {
        assert_eq!(classify("start"), Some(Command::Start));
        assert_eq!(classify("begin the session"), Some(Command::Start));
        // No word boundary, no match
        assert_eq!(classify("restarting"), None);
    }

    #[test]
    fn test_pace_extraction() {
        assert_eq!(classify("set pace to 28"), Some(Command::SetPace(28)));
        assert_eq!(classify("pace 30"), Some(Command::SetPace(30)));
        assert_eq!(classify("change pace to 25"), Some(Command::SetPace(25)));
    }

    #[test]
    fn test_interval_extraction() {
        assert_eq!(
            classify("set interval to 3 minutes"),
            Some(Command::SetInterval(3))
        );
        assert_eq!(classify("interval 5"), Some(Command::SetInterval(5)));
        assert_eq!(
            classify("change interval to 10"),
            Some(Command::SetInterval(10))
        );
    }

    #[test]
    fn test_scenery_keywords() {
        assert_matches!(
            classify("show me the mountain lake"),
            Some(Command::SetScenery(id)) if id == "mountain-lake"
        );
        assert_matches!(
            classify("somewhere tropical"),
            Some(Command::SetScenery(id)) if id == "tropical-ocean"
        );
        assert_matches!(
            classify("arctic please"),
            Some(Command::SetScenery(id)) if id == "arctic"
        );
    }

    #[test]
    fn test_unrecognized_input_is_silent() {
        assert_eq!(classify("row row row your boat"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("pace"), None); // no number, no command
    }

    #[test]
    fn test_end_wins_over_argument_commands() {
        // A transcript naming both end and pace is treated as end; stop
        // words always take precedence over argument commands
        assert_eq!(classify("stop and set pace to 30"), Some(Command::End));
    }

    #[test]
    fn test_apply_start_begins_and_resumes() {
        let mut session = test_session();
        assert!(interpret(&mut session, "start").is_none());
        assert_eq!(session.phase, Phase::Warmup);
        assert!(session.is_ticking());
    }

    #[test]
    fn test_apply_full_voice_flow() {
        let mut session = test_session();
        interpret(&mut session, "start");
        for _ in 0..(120 + 90) {
            session.tick();
        }

        interpret(&mut session, "set pace to 30");
        assert_eq!(session.pace, 30.0);

        interpret(&mut session, "change interval to 2");
        assert_eq!(session.interval, 2);
        assert_eq!(session.interval_countdown, 120);

        interpret(&mut session, "pause");
        assert!(!session.is_ticking());
        interpret(&mut session, "keep going");
        assert!(session.is_ticking());

        let summary = interpret(&mut session, "stop").unwrap();
        assert_eq!(summary.elapsed_time, 90);
        assert_eq!(session.phase, Phase::Idle);
    }

    #[test]
    fn test_apply_rejected_arguments_leave_state_alone() {
        let mut session = test_session();
        interpret(&mut session, "start");
        interpret(&mut session, "set pace to 500");
        assert_eq!(session.pace, 24.0);
        interpret(&mut session, "interval 0");
        assert_eq!(session.interval, 5);
    }
}
