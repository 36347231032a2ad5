//! Matrix viewport - pure rendering layer.
//!
//! Each terminal cell shows two vertically stacked viewport pixels using the
//! upper half block: the foreground is the upper pixel, the background the
//! lower one.

use super::colormap::log_transform;
use super::controller::ViewportController;
use super::tile::BACKGROUND;
use super::StatusSink;
use crate::data::MatrixSource;
use crate::ui::{format_number, format_stat_value, ThemeColors};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Viewport pixels per terminal row.
pub const PIXELS_PER_ROW: i32 = 2;

/// Draw the matrix view into `area`.
///
/// Returns the rectangle holding the pixels so pointer events can be mapped
/// back to viewport coordinates.
pub fn draw_matrix_view(
    f: &mut Frame<'_>,
    area: Rect,
    viewer: &mut ViewportController,
    name: &str,
    sink: &mut dyn StatusSink,
    colors: &ThemeColors,
) -> Rect {
    let view = *viewer.view();
    let matrix = viewer.matrix();
    let title = format!(
        " {} [{} x {}] | zoom {} x {} ({}) | {} | {} ",
        name,
        format_number(matrix.width()),
        format_number(matrix.height()),
        format_stat_value(view.x_zoom),
        format_stat_value(view.y_zoom),
        viewer.cache().aggregation().name(),
        view.scale_mode().name(),
        viewer.palette().name(),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .title(title)
        .title_style(Style::default().fg(colors.heading))
        .style(Style::default().bg(colors.bg));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 4 || inner.height < 3 {
        return Rect::default();
    }

    // Colorbar on the first row, pixels below it.
    draw_colorbar(f, Rect { height: 1, ..inner }, viewer, colors);
    let pixels = Rect {
        y: inner.y + 1,
        height: inner.height - 1,
        ..inner
    };

    viewer.layout(
        pixels.width as i32,
        pixels.height as i32 * PIXELS_PER_ROW,
        sink,
    );
    viewer.redraw();

    let background = Color::from(BACKGROUND);
    for row in 0..pixels.height {
        for col in 0..pixels.width {
            let x = col as i32;
            let y = row as i32 * PIXELS_PER_ROW;
            let upper = viewer.pixel_at(x, y).map(Color::from).unwrap_or(background);
            let lower = viewer
                .pixel_at(x, y + 1)
                .map(Color::from)
                .unwrap_or(background);
            if let Some(cell) = f.buffer_mut().cell_mut((pixels.x + col, pixels.y + row)) {
                cell.set_char('▀').set_fg(upper).set_bg(lower);
            }
        }
    }

    if let Some((x, y)) = viewer.cursor() {
        let col = pixels.x as i32 + x;
        let row = pixels.y as i32 + y / PIXELS_PER_ROW;
        let inside = col >= pixels.x as i32
            && col < (pixels.x + pixels.width) as i32
            && row >= pixels.y as i32
            && row < (pixels.y + pixels.height) as i32;
        if inside {
            if let Some(cell) = f.buffer_mut().cell_mut((col as u16, row as u16)) {
                cell.set_char('┼').set_fg(colors.warning);
            }
        }
    }

    pixels
}

fn draw_colorbar(f: &mut Frame<'_>, area: Rect, viewer: &ViewportController, colors: &ThemeColors) {
    let view = viewer.view();
    let low = view.z_offset;
    let high = view.z_offset + view.z_visible_region;
    let min_label = format_axis_label(low);
    let max_label = if view.log_scale {
        format!("{} (log {})", format_axis_label(high), format_axis_label(log_transform(high)))
    } else {
        format_axis_label(high)
    };

    let labels = (min_label.len() + max_label.len() + 2) as u16;
    let bar_width = area.width.saturating_sub(labels).min(60);
    let start = area.x + (area.width.saturating_sub(bar_width + labels)) / 2;

    let mut x = start;
    for ch in min_label.chars().chain(std::iter::once(' ')) {
        put(f, x, area.y, ch, colors.label, area);
        x += 1;
    }
    for i in 0..bar_width {
        let t = i as f64 / bar_width.max(1) as f64;
        let color = Color::from(viewer.palette().color(t));
        put(f, x, area.y, '█', color, area);
        x += 1;
    }
    for ch in std::iter::once(' ').chain(max_label.chars()) {
        put(f, x, area.y, ch, colors.label, area);
        x += 1;
    }
}

fn put(f: &mut Frame<'_>, x: u16, y: u16, ch: char, fg: Color, clip: Rect) {
    if x >= clip.x + clip.width {
        return;
    }
    if let Some(cell) = f.buffer_mut().cell_mut((x, y)) {
        cell.set_char(ch).set_fg(fg);
    }
}

/// Format a colorbar label compactly.
fn format_axis_label(val: f64) -> String {
    let abs_val = val.abs();
    if abs_val == 0.0 {
        "0".to_string()
    } else if !(1e-2..1e5).contains(&abs_val) {
        format!("{:.1e}", val)
    } else if abs_val >= 100.0 {
        format!("{:.0}", val)
    } else {
        format!("{:.2}", val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_labels_are_compact() {
        assert_eq!(format_axis_label(0.0), "0");
        assert_eq!(format_axis_label(1234.4), "1234");
        assert_eq!(format_axis_label(3.14159), "3.14");
        assert_eq!(format_axis_label(250000.0), "2.5e5");
    }
}
