//! Decoded input events and their bindings.
//!
//! Terminal events are translated into [`ViewEvent`]s by the caller, with
//! positions already converted to viewport pixels.

use super::controller::ViewportController;
use super::StatusSink;
use crossterm::event::{KeyCode, KeyModifiers};

/// Pointer buttons, including wheel notches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Primary button; dragging pans.
    Left,
    /// Middle button; zooms to fit.
    Middle,
    /// Secondary button.
    Right,
    /// Wheel away from the user; zooms in.
    WheelUp,
    /// Wheel toward the user; zooms out.
    WheelDown,
}

/// An input event in viewport pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// Key press.
    Key {
        /// Key code.
        code: KeyCode,
        /// Modifier state.
        modifiers: KeyModifiers,
    },
    /// Button press or release.
    Button {
        /// Which button.
        button: PointerButton,
        /// `true` on press, `false` on release.
        pressed: bool,
        /// Pointer column.
        x: i32,
        /// Pointer row.
        y: i32,
        /// Modifier state.
        modifiers: KeyModifiers,
    },
    /// Pointer motion.
    Motion {
        /// Pointer column.
        x: i32,
        /// Pointer row.
        y: i32,
        /// Modifier state.
        modifiers: KeyModifiers,
    },
    /// Pointer entered (`true`) or left (`false`) the viewport.
    Crossing {
        /// Whether the pointer entered.
        entered: bool,
    },
}

impl ViewportController {
    /// Apply an input event.
    ///
    /// Returns `false` for events without a binding so the caller can fall
    /// back to its own handling.
    pub fn handle_event(&mut self, event: &ViewEvent, sink: &mut dyn StatusSink) -> bool {
        let handled = match *event {
            ViewEvent::Key { code, modifiers } => self.handle_key(code, modifiers),
            ViewEvent::Button {
                button,
                pressed,
                x,
                y,
                ..
            } => self.handle_button(button, pressed, x, y),
            ViewEvent::Motion { x, y, .. } => {
                self.handle_motion(x, y);
                true
            },
            ViewEvent::Crossing { entered } => {
                if !entered {
                    self.cursor = None;
                    self.drag_anchor = None;
                }
                true
            },
        };

        if handled {
            tracing::debug!("Handled {:?}", event);
            self.update_status(sink);
        }
        handled
    }

    /// Push the readout under the cursor to `sink`.
    pub fn update_status(&self, sink: &mut dyn StatusSink) {
        let inspection = self.cursor().and_then(|(x, y)| self.inspect(x, y));
        sink.show_cursor(inspection.as_ref());
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        let step = self.navigation.pan_step;
        let zoom = self.navigation.zoom_step;
        let range = self.navigation.range_step;

        let result = match code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.pan(step, 0);
                Ok(())
            },
            KeyCode::Right | KeyCode::Char('l') => {
                self.pan(-step, 0);
                Ok(())
            },
            KeyCode::Up | KeyCode::Char('k') => {
                self.pan(0, step);
                Ok(())
            },
            KeyCode::Down | KeyCode::Char('j') => {
                self.pan(0, -step);
                Ok(())
            },
            KeyCode::Char('z') => {
                let (x, y) = self.zoom_anchor();
                self.zoom_around_cursor(zoom, x, y)
            },
            KeyCode::Char('x') => {
                let (x, y) = self.zoom_anchor();
                self.zoom_around_cursor(1.0 / zoom, x, y)
            },
            KeyCode::Char('f') | KeyCode::Char('1') => {
                self.zoom_full();
                Ok(())
            },
            KeyCode::Char('L') => {
                self.toggle_log_scale();
                Ok(())
            },
            KeyCode::Char('[') => self.scale_visible_region(1.0 / range),
            KeyCode::Char(']') => self.scale_visible_region(range),
            KeyCode::Char('<') | KeyCode::Char(',') => self.shift_visible_range(-0.25),
            KeyCode::Char('>') | KeyCode::Char('.') => self.shift_visible_range(0.25),
            KeyCode::Char('0') => self.reset_visible_range(),
            KeyCode::Char('c') => {
                self.set_palette(self.palette().next());
                Ok(())
            },
            _ => return false,
        };

        if let Err(e) = result {
            tracing::warn!("Ignored key {:?}: {}", code, e);
        }
        true
    }

    fn handle_button(&mut self, button: PointerButton, pressed: bool, x: i32, y: i32) -> bool {
        self.cursor = Some((x, y));
        let zoom = self.navigation.zoom_step;
        match (button, pressed) {
            (PointerButton::Left, true) => {
                self.drag_anchor = Some((x, y));
                true
            },
            (PointerButton::Left, false) => {
                self.drag_anchor = None;
                true
            },
            (PointerButton::Middle, true) => {
                self.zoom_full();
                true
            },
            (PointerButton::WheelUp, true) | (PointerButton::WheelDown, true) => {
                let factor = if button == PointerButton::WheelUp {
                    zoom
                } else {
                    1.0 / zoom
                };
                if let Err(e) = self.zoom_around_cursor(factor, x, y) {
                    tracing::warn!("Ignored wheel zoom: {}", e);
                }
                true
            },
            _ => false,
        }
    }

    fn handle_motion(&mut self, x: i32, y: i32) {
        self.cursor = Some((x, y));
        if let Some((ax, ay)) = self.drag_anchor {
            self.pan(x - ax, y - ay);
            self.drag_anchor = Some((x, y));
        }
    }
}
