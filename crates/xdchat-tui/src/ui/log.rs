//! Scrollback area
//!
//! Displays the newest lines of the session log that fit.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use xdchat_app::App;

const BORDER_SIZE: u16 = 2;

/// Render the scrollback area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" XDchat | {} ", app.config().channel);
    let block = Block::default().borders(Borders::ALL).title(title);

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = app.log().len().saturating_sub(visible_height);
    let items: Vec<ListItem> = app.log().iter().skip(skip).map(|line| styled(line)).collect();

    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}

/// Banner lines in yellow, local echo with a bold nickname, the rest verbatim.
fn styled(line: &str) -> ListItem<'_> {
    if line.starts_with("===") {
        return ListItem::new(Line::from(Span::styled(line, Style::default().fg(Color::Yellow))));
    }

    if line.starts_with('<')
        && let Some((nick, text)) = line.split_once("> ")
    {
        return ListItem::new(Line::from(vec![
            Span::styled(
                format!("{nick}>"),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(text),
        ]));
    }

    ListItem::new(Line::from(line))
}
