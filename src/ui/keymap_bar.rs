//! Keymap help bar UI component.

use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the keymap help bar.
pub(super) fn draw_keymap(f: &mut Frame<'_>, area: Rect, colors: &ThemeColors) {
    let keymap_text = "hjkl/drag:pan | z/x/wheel:zoom | f:fit | L:log | []:range | <>:shift | 0:reset | c:palette | y:copy | T:theme | q:quit";

    let paragraph =
        Paragraph::new(keymap_text).style(Style::default().fg(colors.label).bg(colors.bg));

    f.render_widget(paragraph, area);
}
