//! Input line
//!
//! The box title says where Enter goes: the joined channel while connected,
//! a connect hint while offline. Long lines scroll horizontally so the cursor
//! never leaves the box.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use xdchat_app::{App, InputState};
use xdchat_client::ConnectionState;

const PROMPT: &str = "> ";
const PLACEHOLDER: &str = "/help for commands";

/// Box title for the current connection state.
fn title(app: &App) -> String {
    match app.connection_state() {
        ConnectionState::Connected => format!(" Message {} ", app.config().channel),
        ConnectionState::Disconnected => " Offline: F2 or /connect ".to_string(),
        state => format!(" {state}... "),
    }
}

/// Render the input line.
pub fn render(frame: &mut Frame, app: &App, input: &InputState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(title(app));
    let inner = block.inner(area);

    let prompt_width = PROMPT.len() as u16;
    // One cell stays free for the cursor after the last character.
    let text_width = usize::from(inner.width.saturating_sub(prompt_width + 1));
    let column = input.cursor_column();
    let scroll = column.saturating_sub(text_width);

    let text = if input.buffer().is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
    } else {
        let visible: String = input.buffer().chars().skip(scroll).collect();
        Span::styled(visible, Style::default().fg(Color::White))
    };
    frame.render_widget(Paragraph::new(Line::from(vec![Span::raw(PROMPT), text])).block(block), area);

    if inner.width > prompt_width && inner.height > 0 {
        let offset = u16::try_from(column - scroll).unwrap_or(u16::MAX);
        let cursor_x =
            inner.x.saturating_add(prompt_width).saturating_add(offset).min(inner.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y));
    }
}
