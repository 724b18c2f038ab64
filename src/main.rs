pub mod app_dirs;
pub mod clock;
pub mod command;
pub mod distance;
pub mod history;
pub mod interval_clock;
pub mod journey;
pub mod persist;
pub mod reconcile;
pub mod runtime;
pub mod session;
pub mod ui;

use crate::{
    clock::{Clock, SystemClock},
    distance::format_distance,
    history::HistoryDb,
    persist::{FileGateway, PersistenceGateway},
    reconcile::reconcile,
    runtime::{CrosstermEventSource, Runner, SessionEvent},
    session::{SessionSummary, WorkoutSession, MAX_PACE},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::Arc,
};

/// rowing workout tui with virtual journeys and interruption-safe sessions
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A rowing workout TUI: warmup and interval countdowns, distance credited toward virtual journeys, voice-style text commands, and sessions that survive being suspended or restarted."
)]
pub struct Cli {
    /// interval length in minutes
    #[clap(short = 'i', long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=120))]
    interval: u32,

    /// target pace in strokes per minute
    #[clap(short = 'p', long, default_value_t = 24.0)]
    pace: f64,

    /// journey to row (see --list-journeys)
    #[clap(short = 'j', long)]
    journey: Option<String>,

    /// list the journey catalogue and exit
    #[clap(long)]
    list_journeys: bool,

    /// show recent workout history and exit
    #[clap(long)]
    history: bool,
}

#[derive(Debug)]
pub struct App {
    pub cli: Option<Cli>,
    pub session: WorkoutSession,
    pub history: Option<HistoryDb>,
    /// Some while the command bar is open
    pub command_input: Option<String>,
    /// Last transcript fed through the interpreter
    pub last_command: Option<String>,
}

impl App {
    pub fn new(cli: Cli, session: WorkoutSession) -> Self {
        Self {
            cli: Some(cli),
            session,
            history: HistoryDb::new().ok(),
            command_input: None,
            last_command: None,
        }
    }

    fn record_history(&self, summary: Option<SessionSummary>) {
        if let (Some(db), Some(summary)) = (&self.history, summary) {
            let _ = db.record(&summary);
        }
    }
}

fn print_journeys() {
    for journey in journey::JOURNEYS {
        println!(
            "{:<20} {:>8}  {} -> {}",
            journey.id,
            format_distance(journey.distance),
            journey.from,
            journey.to
        );
    }
}

fn print_history() {
    let Ok(db) = HistoryDb::new() else {
        println!("no workout history");
        return;
    };
    let entries = db.recent(20).unwrap_or_default();
    if entries.is_empty() {
        println!("no workout history");
        return;
    }
    for entry in entries {
        println!(
            "{}  {:>5}s  {:>2} intervals  {:>8}  {}",
            entry.ended_at.format("%Y-%m-%d %H:%M"),
            entry.elapsed_secs,
            entry.intervals_completed,
            format_distance(entry.distance_meters),
            entry.journey_id
        );
    }
    if let Ok(total) = db.total_distance() {
        println!("total: {}", format_distance(total));
    }
}

/// Build the session: reconcile a live snapshot when one exists, otherwise
/// start idle with the CLI presets applied.
fn build_session(cli: &Cli, gateway: FileGateway, clock: Arc<dyn Clock>) -> WorkoutSession {
    if let Some(snapshot) = gateway.load_snapshot() {
        if let Some(restored) = reconcile(snapshot, Box::new(gateway.clone()), clock.clone()) {
            return restored.session;
        }
    }

    let mut session = WorkoutSession::new(Box::new(gateway), clock);
    session.interval = cli.interval;
    session.pace = cli.pace;
    session
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list_journeys {
        print_journeys();
        return Ok(());
    }
    if cli.history {
        print_history();
        return Ok(());
    }

    let mut cmd = Cli::command();
    if !(cli.pace > 0.0 && cli.pace <= MAX_PACE) {
        cmd.error(ErrorKind::ValueValidation, "pace must be in (0, 120]")
            .exit();
    }
    if let Some(id) = &cli.journey {
        if journey::journey_by_id(id).is_none() {
            cmd.error(
                ErrorKind::ValueValidation,
                format!("unknown journey '{id}' (see --list-journeys)"),
            )
            .exit();
        }
    }
    if !stdin().is_tty() {
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let gateway = FileGateway::new();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session = build_session(&cli, gateway, clock);
    let mut app = App::new(cli, session);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new());

    loop {
        terminal.draw(|f| draw(app, f))?;

        match runner.step(&mut app.session) {
            SessionEvent::Tick => {}
            SessionEvent::Resize => {}
            SessionEvent::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    // Leaving without end(): the snapshot stays behind and
                    // reconciliation picks the session up on next launch
                    break;
                }
                if let Some(input) = &mut app.command_input {
                    match key.code {
                        KeyCode::Enter => {
                            let text = input.clone();
                            app.command_input = None;
                            if !text.is_empty() {
                                let summary = command::interpret(&mut app.session, &text);
                                app.record_history(summary);
                                app.last_command = Some(text);
                            }
                        }
                        KeyCode::Esc => app.command_input = None,
                        KeyCode::Backspace => {
                            input.pop();
                        }
                        KeyCode::Char(c) => input.push(c),
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Char('s') => {
                            let (interval, pace, journey) = match &app.cli {
                                Some(cli) => (cli.interval, cli.pace, cli.journey.clone()),
                                None => (app.session.interval, app.session.pace, None),
                            };
                            app.session.start(interval, pace, journey.as_deref());
                        }
                        KeyCode::Char(' ') => {
                            if app.session.paused {
                                app.session.resume();
                            } else {
                                app.session.pause();
                            }
                        }
                        KeyCode::Char('e') => {
                            let summary = app.session.end();
                            app.record_history(summary);
                        }
                        KeyCode::Char(':') => app.command_input = Some(String::new()),
                        _ => {}
                    }
                }
            }
        }
    }

    // Persist a final snapshot so a quit mid-session reconciles cleanly
    if app.session.is_ticking() || app.session.paused {
        app.session.persist_snapshot();
    }

    Ok(())
}

fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
