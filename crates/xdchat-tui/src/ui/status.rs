//! Status bar
//!
//! Displays identity, channel, connection state and the transient status
//! message.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use xdchat_app::App;
use xdchat_client::ConnectionState;

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.connection_state();
    let state_style = match state {
        ConnectionState::Disconnected => Style::default().fg(Color::Red),
        ConnectionState::Connecting | ConnectionState::Disconnecting => {
            Style::default().fg(Color::Yellow)
        },
        ConnectionState::Connected => {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        },
    };

    let config = app.config();
    let mut spans = vec![
        Span::raw(format!(" Nick: {} | Channel: {} | ", config.nickname, config.channel)),
        Span::styled(state.to_string(), state_style),
    ];
    if let Some(message) = app.status_message() {
        spans.push(Span::styled(format!(" | {message}"), Style::default().fg(Color::Gray)));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
