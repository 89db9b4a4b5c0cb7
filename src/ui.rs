//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! The layout is a two-row split: the scrollable activity log on top and a
//! one-line status bar at the bottom.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{ActivityKind, App};

/// Longest key prefix shown in the status bar.
const KEY_PREVIEW_CHARS: usize = 24;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_activity(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

fn kind_style(kind: ActivityKind) -> Style {
    match kind {
        ActivityKind::Info => Style::default().fg(Color::White),
        ActivityKind::Key => Style::default().fg(Color::Green),
        ActivityKind::Error => Style::default().fg(Color::Red),
    }
}

/// Render the scrollable activity log.
fn draw_activity(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .activity
        .iter()
        .map(|entry| {
            let line = Line::from(vec![
                Span::styled(
                    entry.at.format("%H:%M:%S%.3f").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(&entry.text, kind_style(entry.kind)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let title = format!(" Ephemeral keys (api_version {}) ", app.api_version);
    let list = List::new(list_items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// First [`KEY_PREVIEW_CHARS`] characters of `key`, with an ellipsis if cut.
fn key_preview(key: &str) -> String {
    let mut chars = key.chars();
    let head: String = chars.by_ref().take(KEY_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let key = app
        .last_key
        .as_deref()
        .map(key_preview)
        .unwrap_or_else(|| "none".into());

    let status = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", app.spinner()), Style::default().fg(Color::Cyan)),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} in flight", app.in_flight),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(format!("key: {key}"), Style::default().fg(Color::Magenta)),
        Span::raw("  r: request  c: cancel  x: clear  q: quit"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AppMsg;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App, width: u16) -> String {
        let backend = TestBackend::new(width, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn key_preview_truncates_long_keys() {
        assert_eq!(key_preview("short"), "short");
        let long = "k".repeat(40);
        assert_eq!(key_preview(&long), format!("{}…", "k".repeat(KEY_PREVIEW_CHARS)));
        assert_eq!(key_preview(&"k".repeat(KEY_PREVIEW_CHARS)), "k".repeat(KEY_PREVIEW_CHARS));
    }

    #[test]
    fn draw_does_not_panic_when_empty() {
        let mut app = App::new("2017-06-05");
        render(&mut app, 80);
    }

    #[test]
    fn status_bar_shows_in_flight_count() {
        let mut app = App::new("2017-06-05");
        app.apply(AppMsg::ProgressStart);
        app.apply(AppMsg::ProgressStart);

        let text = render(&mut app, 160);
        assert!(text.contains("2 in flight"), "status bar should show in-flight count");
    }

    #[test]
    fn activity_and_key_are_rendered() {
        let mut app = App::new("2017-06-05");
        app.apply(AppMsg::ProgressStart);
        app.apply(AppMsg::KeyUpdate("ephkey_abc".into()));
        app.apply(AppMsg::Text("ephkey_abc".into()));
        app.apply(AppMsg::ProgressStop);
        app.select_first();

        let text = render(&mut app, 160);
        assert!(text.contains("request started"));
        assert!(text.contains("key: ephkey_abc"));
        assert!(text.contains("api_version 2017-06-05"));
    }
}
