//! Matrix viewer feature - tiled rendering of a two-dimensional matrix.
//!
//! The matrix is drawn from square tiles that are rendered once and cached.
//! Panning only changes which tiles are visible; zoom, scale mode, value
//! window and palette changes alter every pixel and flush the cache.
//!
//! - [`coords`]: conversions between data, tile and screen coordinates
//! - [`colormap`]: value to color mapping
//! - [`tile`]: tile keys and the tile rasterizer
//! - [`cache`]: the tile cache
//! - [`controller`]: view state transitions and redraw orchestration
//! - [`event`]: decoded input events and their bindings
//! - [`ui`]: drawing the viewport into a terminal frame

pub mod cache;
pub mod colormap;
pub mod controller;
pub mod coords;
pub mod event;
pub mod tile;
pub mod ui;

use crate::error::{MatviewError, Result};

pub use cache::{CacheStats, TileCache};
pub use colormap::{ColorMapper, ColorPalette, Rgb, RAMP_SIZE};
pub use controller::ViewportController;
pub use coords::{TileRect, TILE_SIDE};
pub use event::{PointerButton, ViewEvent};
pub use tile::{Tile, TileKey, TileRenderer};

/// Linear or logarithmic value scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Values map linearly onto the ramp.
    #[default]
    Linear,
    /// Values are log-transformed before mapping.
    Log,
}

impl ScaleMode {
    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "lin",
            Self::Log => "log",
        }
    }
}

/// Zoom, pan and contrast parameters of the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Horizontal pixels per data unit.
    pub x_zoom: f64,
    /// Vertical pixels per data unit.
    pub y_zoom: f64,
    /// Screen column of tile-space x = 0.
    pub x_tile_offset: i32,
    /// Screen row of tile-space y = 0.
    pub y_tile_offset: i32,
    /// Width of the value window mapped onto the ramp.
    pub z_visible_region: f64,
    /// Lowest value of the window.
    pub z_offset: f64,
    /// Whether values are log-transformed.
    pub log_scale: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            x_zoom: 1.0,
            y_zoom: 1.0,
            x_tile_offset: 0,
            y_tile_offset: 0,
            z_visible_region: 1.0,
            z_offset: 0.0,
            log_scale: false,
        }
    }
}

impl ViewState {
    /// Check the zoom factors and value window.
    pub fn validate(&self) -> Result<()> {
        if !(self.x_zoom > 0.0 && self.x_zoom.is_finite()) {
            return Err(MatviewError::invalid_view(format!("x zoom {}", self.x_zoom)));
        }
        if !(self.y_zoom > 0.0 && self.y_zoom.is_finite()) {
            return Err(MatviewError::invalid_view(format!("y zoom {}", self.y_zoom)));
        }
        if !(self.z_visible_region > 0.0 && self.z_visible_region.is_finite()) {
            return Err(MatviewError::invalid_view(format!(
                "visible region {}",
                self.z_visible_region
            )));
        }
        if !self.z_offset.is_finite() {
            return Err(MatviewError::invalid_view(format!("offset {}", self.z_offset)));
        }
        Ok(())
    }

    /// Current scale mode.
    pub fn scale_mode(&self) -> ScaleMode {
        if self.log_scale {
            ScaleMode::Log
        } else {
            ScaleMode::Linear
        }
    }
}

/// Read-only copy of everything that determines tile pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot {
    /// View parameters.
    pub view: ViewState,
    /// Ramp palette.
    pub palette: ColorPalette,
    /// Bumped on every change that alters rendered pixels.
    pub generation: u64,
}

/// Result of inspecting a screen position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inspection {
    /// Data x under the position.
    pub x: f64,
    /// Data y under the position.
    pub y: f64,
    /// Column of the cell.
    pub cell_x: usize,
    /// Row of the cell.
    pub cell_y: usize,
    /// Cell value.
    pub value: f64,
}

/// Receiver for status information produced by the viewer.
pub trait StatusSink {
    /// Cursor readout; `None` when the cursor is off the matrix or outside the view.
    fn show_cursor(&mut self, inspection: Option<&Inspection>);

    /// New viewport size in pixels.
    fn show_viewport(&mut self, width: i32, height: i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_valid() {
        assert!(ViewState::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_parameters() {
        let bad_zoom = ViewState {
            x_zoom: 0.0,
            ..ViewState::default()
        };
        assert!(bad_zoom.validate().is_err());
        let bad_region = ViewState {
            z_visible_region: -1.0,
            ..ViewState::default()
        };
        assert!(matches!(
            bad_region.validate(),
            Err(MatviewError::InvalidViewState(_))
        ));
        let nan_zoom = ViewState {
            y_zoom: f64::NAN,
            ..ViewState::default()
        };
        assert!(nan_zoom.validate().is_err());
    }
}
