//! Status bar UI component.

use crate::app::StatusLine;
use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};
use unicode_width::UnicodeWidthStr;

/// Draw the status bar: the message on the left, the cursor readout on the right.
pub(super) fn draw_status(f: &mut Frame<'_>, area: Rect, status: &StatusLine, colors: &ThemeColors) {
    let text = compose(&status.message, &status.readout, area.width as usize);
    let paragraph =
        Paragraph::new(text).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    f.render_widget(paragraph, area);
}

// Right-align `right` after `left`, dropping the message tail when space runs out.
fn compose(left: &str, right: &str, width: usize) -> String {
    let right_width = right.width();
    if right_width >= width {
        return right.to_string();
    }

    let room = width - right_width;
    let mut out = String::new();
    let mut used = 0;
    for ch in left.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > room {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(room - used));
    out.push_str(right);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_is_right_aligned() {
        let line = compose("Ready", "x=1 y=2", 20);
        assert_eq!(line.width(), 20);
        assert!(line.starts_with("Ready"));
        assert!(line.ends_with("x=1 y=2"));
    }

    #[test]
    fn long_message_is_truncated() {
        let line = compose("a very long status message", "z=3", 10);
        assert_eq!(line.width(), 10);
        assert!(line.ends_with("z=3"));
    }

    #[test]
    fn wide_characters_are_measured() {
        let line = compose("日本語", "z", 8);
        assert_eq!(line.width(), 8);
    }
}
