//! Application state and logic.

use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::clipboard::copy_to_clipboard;
use crate::config::ViewerConfig;
use crate::data::Matrix;
use crate::ui::format_stat_value;
use crate::view2d::ui::PIXELS_PER_ROW;
use crate::view2d::{Inspection, PointerButton, StatusSink, ViewEvent, ViewportController};

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Text shown in the status bar.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    /// Last status message.
    pub message: String,
    /// Cursor readout, empty when the cursor is off the matrix.
    pub readout: String,
    /// Viewport size in pixels.
    pub viewport: (i32, i32),
}

impl StatusSink for StatusLine {
    fn show_cursor(&mut self, inspection: Option<&Inspection>) {
        self.readout = match inspection {
            Some(i) => format!(
                "x={} y={} z={}",
                i.cell_x,
                i.cell_y,
                format_stat_value(i.value)
            ),
            None => String::new(),
        };
    }

    fn show_viewport(&mut self, width: i32, height: i32) {
        self.viewport = (width, height);
    }
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Matrix viewer.
    pub viewer: ViewportController,
    /// Matrix name shown in the title.
    pub name: String,
    /// Loaded file.
    pub file_path: PathBuf,
    /// Status bar contents.
    pub status: StatusLine,
    /// Current theme.
    pub theme: Theme,
    /// Terminal area holding the viewer pixels, set on every draw.
    pub view_area: Rect,
    pointer_inside: bool,
}

impl App {
    /// Create a viewer for a loaded matrix.
    pub fn new(matrix: Matrix, file_path: PathBuf, config: ViewerConfig) -> Self {
        let name = matrix.name.clone();
        let status = StatusLine {
            message: format!(
                "{} loaded",
                file_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "file".to_string())
            ),
            ..StatusLine::default()
        };

        Self {
            viewer: ViewportController::new(Arc::new(matrix), config),
            name,
            file_path,
            status,
            theme: Theme::GruvboxDark,
            view_area: Rect::default(),
            pointer_inside: false,
        }
    }

    /// Handle a key press. Returns `true` when the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) | (KeyModifiers::NONE, KeyCode::Esc) => {
                return true;
            },
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return true,
            (KeyModifiers::SHIFT, KeyCode::Char('T')) => self.cycle_theme(),
            (KeyModifiers::NONE, KeyCode::Char('y')) => self.copy_readout(),
            (modifiers, code) => {
                let event = ViewEvent::Key { code, modifiers };
                if self.viewer.handle_event(&event, &mut self.status) {
                    self.status.message = self.describe_view();
                } else {
                    self.status.message = format!("Unbound key: {:?}", code);
                }
            },
        }
        false
    }

    /// Decode a terminal mouse event into viewer events.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some((x, y)) = self.to_pixels(mouse.column, mouse.row) else {
            if matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left)) {
                self.send(ViewEvent::Button {
                    button: PointerButton::Left,
                    pressed: false,
                    x: -1,
                    y: -1,
                    modifiers: mouse.modifiers,
                });
            }
            if self.pointer_inside {
                self.pointer_inside = false;
                self.send(ViewEvent::Crossing { entered: false });
            }
            return;
        };

        if !self.pointer_inside {
            self.pointer_inside = true;
            self.send(ViewEvent::Crossing { entered: true });
        }

        let modifiers = mouse.modifiers;
        let event = match mouse.kind {
            MouseEventKind::Down(button) | MouseEventKind::Up(button) => ViewEvent::Button {
                button: pointer_button(button),
                pressed: matches!(mouse.kind, MouseEventKind::Down(_)),
                x,
                y,
                modifiers,
            },
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => ViewEvent::Button {
                button: if mouse.kind == MouseEventKind::ScrollUp {
                    PointerButton::WheelUp
                } else {
                    PointerButton::WheelDown
                },
                pressed: true,
                x,
                y,
                modifiers,
            },
            MouseEventKind::Drag(_) | MouseEventKind::Moved => ViewEvent::Motion { x, y, modifiers },
            _ => return,
        };
        self.send(event);
    }

    /// Terminal focus changed.
    pub fn handle_focus(&mut self, gained: bool) {
        if !gained {
            self.pointer_inside = false;
            self.send(ViewEvent::Crossing { entered: false });
        }
    }

    /// Copy the cursor readout to the clipboard.
    pub fn copy_readout(&mut self) {
        if self.status.readout.is_empty() {
            self.status.message = "Nothing to copy".to_string();
            return;
        }
        match copy_to_clipboard(&self.status.readout) {
            Ok(()) => self.status.message = format!("Copied {}", self.status.readout),
            Err(e) => {
                tracing::warn!("Clipboard error: {}", e);
                self.status.message = format!("Copy failed: {}", e);
            },
        }
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status.message = format!("Theme: {}", self.theme.name());
    }

    fn send(&mut self, event: ViewEvent) {
        if self.viewer.handle_event(&event, &mut self.status) {
            if let ViewEvent::Button { .. } = event {
                self.status.message = self.describe_view();
            }
        }
    }

    fn describe_view(&self) -> String {
        let view = self.viewer.view();
        format!(
            "Palette: {} | {} | window {} .. {} | {} tiles cached",
            self.viewer.palette().name(),
            view.scale_mode().name(),
            format_stat_value(view.z_offset),
            format_stat_value(view.z_offset + view.z_visible_region),
            self.viewer.cache().len(),
        )
    }

    // Upper pixel of the cell under (column, row), if it is inside the viewer.
    fn to_pixels(&self, column: u16, row: u16) -> Option<(i32, i32)> {
        let area = self.view_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| {
            (
                (column - area.x) as i32,
                (row - area.y) as i32 * PIXELS_PER_ROW,
            )
        })
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Left,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Right => PointerButton::Right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let m = Matrix::from_fn("grid", 20, 20, |x, y| (x + 100 * y) as f64);
        let mut app = App::new(m, PathBuf::from("/tmp/grid.txt"), ViewerConfig::default());
        app.view_area = Rect::new(1, 2, 40, 20);
        app.viewer.layout(40, 40, &mut app.status);
        app
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn new_app_reports_loaded_file() {
        let app = app();
        assert_eq!(app.status.message, "grid.txt loaded");
        assert_eq!(app.name, "grid");
        assert_eq!(app.status.viewport, (40, 40));
    }

    #[test]
    fn readout_formats_cell_and_value() {
        let mut status = StatusLine::default();
        status.show_cursor(Some(&Inspection {
            x: 3.5,
            y: 4.25,
            cell_x: 3,
            cell_y: 4,
            value: 403.0,
        }));
        assert_eq!(status.readout, "x=3 y=4 z=403.00");
        status.show_cursor(None);
        assert!(status.readout.is_empty());
    }

    #[test]
    fn mouse_motion_is_mapped_to_pixels() {
        let mut app = app();
        // Zoom is 2: column 1 + 6 is pixel x 6 (cell 3), row 2 + 19 is pixel y 38.
        app.handle_mouse(mouse(MouseEventKind::Moved, 7, 21));
        assert_eq!(app.viewer.cursor(), Some((6, 38)));
        assert!(app.status.readout.starts_with("x=3 y=0 "));
    }

    #[test]
    fn leaving_the_viewer_clears_readout() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Moved, 7, 21));
        assert!(!app.status.readout.is_empty());
        app.handle_mouse(mouse(MouseEventKind::Moved, 0, 0));
        assert!(app.status.readout.is_empty());
        assert!(app.viewer.cursor().is_none());
    }

    #[test]
    fn focus_loss_clears_readout() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Moved, 7, 21));
        app.handle_focus(false);
        assert!(app.status.readout.is_empty());
    }

    #[test]
    fn wheel_zooms_in() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::ScrollUp, 10, 10));
        assert!((app.viewer.view().x_zoom - 4.0).abs() < 1e-12);
        assert!(app.status.message.starts_with("Palette:"));
    }

    #[test]
    fn keys_quit_and_dispatch() {
        let mut app = app();
        assert!(app.handle_key(press(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(app.handle_key(press(KeyCode::Esc, KeyModifiers::NONE)));

        assert!(!app.handle_key(press(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(app.status.message.starts_with("Palette: Viridis"));

        assert!(!app.handle_key(press(KeyCode::Char('?'), KeyModifiers::NONE)));
        assert!(app.status.message.starts_with("Unbound key"));

        assert!(!app.handle_key(press(KeyCode::Char('T'), KeyModifiers::SHIFT)));
        assert_eq!(app.theme, Theme::GruvboxLight);
    }

    #[test]
    fn copy_without_readout_is_a_no_op() {
        let mut app = app();
        app.copy_readout();
        assert_eq!(app.status.message, "Nothing to copy");
    }
}
