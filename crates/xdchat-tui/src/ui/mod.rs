//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into the frame.

mod input;
mod log;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use xdchat_app::{App, InputState};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input_state: &InputState) {
    const LOG_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(LOG_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [log_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    log::render(frame, app, *log_area);
    input::render(frame, app, input_state, *input_area);
    status::render(frame, app, *status_area);
}
