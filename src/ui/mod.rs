//! User interface rendering.

mod formatters;
mod keymap_bar;
mod status_bar;
mod theme;

use crate::app::App;
use crate::view2d::ui::draw_matrix_view;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use formatters::{format_number, format_stat_value};
pub use theme::ThemeColors;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let colors = ThemeColors::from_theme(&app.theme);

    // Viewer, status bar and key map bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    app.view_area = draw_matrix_view(
        f,
        chunks[0],
        &mut app.viewer,
        &app.name,
        &mut app.status,
        &colors,
    );

    status_bar::draw_status(f, chunks[1], &app.status, &colors);
    keymap_bar::draw_keymap(f, chunks[2], &colors);
}
