use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};

use crate::distance::format_distance;
use crate::journey::journey_by_id;
use crate::session::Phase;
use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;

fn format_hms(total_secs: u64) -> String {
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let yellow_bold = Style::default().patch(bold_style).fg(Color::Yellow);
        let green_bold = Style::default().patch(bold_style).fg(Color::Green);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(2)
            .constraints(
                [
                    Constraint::Length(2), // headline
                    Constraint::Length(2), // countdown
                    Constraint::Length(2), // stats
                    Constraint::Length(2), // journey gauge
                    Constraint::Min(1),    // spacer
                    Constraint::Length(2), // command bar / hints
                ]
                .as_ref(),
            )
            .split(area);

        let headline = match (session.phase, session.paused) {
            (Phase::Idle, _) => Span::styled("IDLE - press s to start a session", dim_style),
            (Phase::Warmup, true) => Span::styled("WARMUP (paused) - space to row", yellow_bold),
            (Phase::Warmup, false) => Span::styled("WARMUP", yellow_bold),
            (Phase::Active, true) => Span::styled("PAUSED", yellow_bold),
            (Phase::Active, false) => Span::styled("ROWING", green_bold),
        };
        Paragraph::new(headline)
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let countdown = match session.phase {
            Phase::Idle => String::new(),
            Phase::Warmup => format!(
                "warmup {}",
                format_hms(u64::from(session.warmup_countdown))
            ),
            Phase::Active => format!(
                "interval {} of {} min, {} left",
                session.intervals_completed + 1,
                session.interval,
                format_hms(session.interval_countdown.max(0) as u64)
            ),
        };
        Paragraph::new(Span::styled(countdown, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let stats = Line::from(vec![
            Span::styled(format_hms(session.elapsed_time), bold_style),
            Span::raw("  "),
            Span::styled(format!("{:.0} spm", session.pace), bold_style),
            Span::raw("  "),
            Span::styled(format_distance(session.session_distance()), bold_style),
            Span::raw("  "),
            Span::styled(
                format!("{} intervals", session.intervals_completed),
                dim_style,
            ),
        ]);
        Paragraph::new(stats)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        if let Some(journey) = journey_by_id(&session.journey_id) {
            let ratio = (session.journey_progress() / journey.distance).clamp(0.0, 1.0);
            Gauge::default()
                .ratio(ratio)
                .label(format!(
                    "{}: {} / {}",
                    journey.name,
                    format_distance(session.journey_progress()),
                    format_distance(journey.distance)
                ))
                .gauge_style(Style::default().fg(Color::Cyan))
                .render(chunks[3], buf);
        }

        let footer = if let Some(input) = &self.command_input {
            Line::from(vec![
                Span::styled("> ", bold_style),
                Span::raw(input.clone()),
                Span::styled("_", dim_style),
            ])
        } else if let Some(cmd) = &self.last_command {
            Line::from(Span::styled(format!("heard: {cmd}"), dim_style))
        } else {
            Line::from(Span::styled(
                "s start  space pause/row  e end  : command  q quit",
                dim_style,
            ))
        };
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[5], buf);
    }
}
