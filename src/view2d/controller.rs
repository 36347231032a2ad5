//! Viewport state machine.
//!
//! Every operation that changes how pixels are computed bumps the view
//! generation and flushes the tile cache in the same call, so no redraw can
//! observe new parameters together with tiles rendered under old ones.

use super::cache::TileCache;
use super::colormap::{ColorPalette, Rgb};
use super::coords::{self, tile_index, TileRect, TILE_SIDE};
use super::tile::TileKey;
use super::{Inspection, ScaleMode, StatusSink, ViewSnapshot, ViewState};
use crate::config::{NavigationConfig, ViewerConfig};
use crate::data::{MatrixSource, RangeProvider};
use crate::error::{MatviewError, Result};
use std::sync::Arc;

/// Owns the view state and tile cache for one matrix.
pub struct ViewportController {
    matrix: Arc<dyn MatrixSource>,
    view: ViewState,
    palette: ColorPalette,
    generation: u64,
    cache: TileCache,
    pub(super) navigation: NavigationConfig,
    width: i32,
    height: i32,
    fitted: bool,
    pub(super) cursor: Option<(i32, i32)>,
    pub(super) drag_anchor: Option<(i32, i32)>,
}

impl std::fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportController")
            .field("view", &self.view)
            .field("palette", &self.palette)
            .field("generation", &self.generation)
            .field("viewport", &(self.width, self.height))
            .field("cached_tiles", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl ViewportController {
    /// Create a controller for `matrix`.
    ///
    /// The value window starts at the matrix range; the zoom is fitted on the
    /// first [`layout`](Self::layout) with a non-empty viewport.
    pub fn new(matrix: Arc<dyn MatrixSource>, config: ViewerConfig) -> Self {
        let mut controller = Self {
            matrix,
            view: ViewState::default(),
            palette: ColorPalette::default(),
            generation: 0,
            cache: TileCache::new(config.cache),
            navigation: config.navigation,
            width: 0,
            height: 0,
            fitted: false,
            cursor: None,
            drag_anchor: None,
        };
        let (offset, region) = controller.default_window();
        controller.view.z_offset = offset;
        controller.view.z_visible_region = region;
        controller
    }

    /// Current view parameters.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Read-only snapshot handed to the renderer.
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view: self.view,
            palette: self.palette,
            generation: self.generation,
        }
    }

    /// Current view generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Tile cache.
    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    /// Matrix being displayed.
    pub fn matrix(&self) -> &dyn MatrixSource {
        self.matrix.as_ref()
    }

    /// Viewport size in pixels.
    pub fn viewport(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Active palette.
    pub fn palette(&self) -> ColorPalette {
        self.palette
    }

    /// Last known pointer position.
    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.cursor
    }

    /// Update the viewport size and report it to `sink`.
    pub fn layout(&mut self, width: i32, height: i32, sink: &mut dyn StatusSink) {
        let width = width.max(0);
        let height = height.max(0);
        if (width, height) == (self.width, self.height) {
            return;
        }
        tracing::debug!("Viewport resized to {}x{}", width, height);
        self.width = width;
        self.height = height;
        sink.show_viewport(width, height);
        if !self.fitted && width > 0 && height > 0 {
            self.zoom_full();
        }
    }

    /// Tile-grid rectangle intersecting the viewport.
    pub fn visible_tiles(&self) -> Option<TileRect> {
        TileRect::visible(&self.view, self.width, self.height)
    }

    /// Shift the view by a screen-pixel delta.
    ///
    /// Cached tiles stay valid; only tiles far outside the new view are weeded.
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let x_offset = self.view.x_tile_offset as i64 + dx as i64;
        let y_offset = self.view.y_tile_offset as i64 + dy as i64;
        self.view.x_tile_offset = coords::clamp_offset(x_offset);
        self.view.y_tile_offset = coords::clamp_offset(y_offset);
        if let Some(visible) = self.visible_tiles() {
            self.cache.weed(visible, self.cache.weed_margin());
        }
    }

    /// Fit the whole matrix into the viewport.
    pub fn zoom_full(&mut self) {
        if self.width <= 0 || self.height <= 0 {
            return;
        }
        let (x_lo, x_hi) = self.matrix.x_range();
        let (y_lo, y_hi) = self.matrix.y_range();
        if !(x_hi > x_lo && y_hi > y_lo) {
            return;
        }

        self.view.x_zoom = self.width as f64 / (x_hi - x_lo);
        self.view.y_zoom = self.height as f64 / (y_hi - y_lo);
        self.view.x_tile_offset = -(x_lo * self.view.x_zoom).round() as i32;
        self.view.y_tile_offset = self.height - 1 + (y_lo * self.view.y_zoom).round() as i32;
        self.fitted = true;
        tracing::info!(
            "Zoom full: {:.4} x {:.4} px/cell",
            self.view.x_zoom,
            self.view.y_zoom
        );
        self.invalidate();
    }

    /// Multiply both zoom factors by `factor`, keeping the data point under
    /// `(x, y)` at the same screen position.
    pub fn zoom_around_cursor(&mut self, factor: f64, x: i32, y: i32) -> Result<()> {
        if !(factor > 0.0 && factor.is_finite()) {
            return Err(MatviewError::invalid_view(format!("zoom factor {}", factor)));
        }
        let x_zoom = self.view.x_zoom * factor;
        let y_zoom = self.view.y_zoom * factor;
        if !(x_zoom > 0.0 && x_zoom.is_finite() && y_zoom > 0.0 && y_zoom.is_finite()) {
            return Err(MatviewError::invalid_view(format!(
                "zoom {} x {}",
                x_zoom, y_zoom
            )));
        }

        let data_x = coords::x_screen_to_data(&self.view, x);
        let data_y = coords::y_screen_to_data(&self.view, y);
        let x_offset = (x as f64 - data_x * x_zoom).round();
        let y_offset = (y as f64 + data_y * y_zoom).round();

        // The zoomed extent and the new offsets must stay inside tile space.
        let (x_lo, x_hi) = self.matrix.x_range();
        let (y_lo, y_hi) = self.matrix.y_range();
        let limit = coords::TILE_SPACE_LIMIT as f64;
        let fits = [
            x_lo * x_zoom,
            x_hi * x_zoom,
            y_lo * y_zoom,
            y_hi * y_zoom,
            x_offset,
            y_offset,
        ]
        .iter()
        .all(|v| v.abs() <= limit);
        if !fits {
            return Err(MatviewError::invalid_view(format!(
                "zoom {} x {} leaves the addressable tile space",
                x_zoom, y_zoom
            )));
        }

        self.view.x_zoom = x_zoom;
        self.view.y_zoom = y_zoom;
        self.view.x_tile_offset = x_offset as i32;
        self.view.y_tile_offset = y_offset as i32;
        tracing::debug!("Zoomed by {} around ({}, {})", factor, x, y);
        self.invalidate();
        Ok(())
    }

    /// Switch between linear and log scale.
    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        let log_scale = mode == ScaleMode::Log;
        if self.view.log_scale != log_scale {
            self.view.log_scale = log_scale;
            self.invalidate();
        }
    }

    /// Flip the scale mode.
    pub fn toggle_log_scale(&mut self) {
        let mode = match self.view.scale_mode() {
            ScaleMode::Linear => ScaleMode::Log,
            ScaleMode::Log => ScaleMode::Linear,
        };
        self.set_scale_mode(mode);
    }

    /// Map `[offset, offset + region]` onto the ramp.
    ///
    /// Rejects a non-positive or non-finite window and leaves the view unchanged.
    pub fn set_visible_range(&mut self, offset: f64, region: f64) -> Result<()> {
        let candidate = ViewState {
            z_offset: offset,
            z_visible_region: region,
            ..self.view
        };
        candidate.validate()?;
        if candidate != self.view {
            self.view = candidate;
            self.invalidate();
        }
        Ok(())
    }

    /// Scale the window width by `factor`, keeping its offset.
    pub fn scale_visible_region(&mut self, factor: f64) -> Result<()> {
        self.set_visible_range(self.view.z_offset, self.view.z_visible_region * factor)
    }

    /// Move the window by `fraction` of its width.
    pub fn shift_visible_range(&mut self, fraction: f64) -> Result<()> {
        let offset = self.view.z_offset + self.view.z_visible_region * fraction;
        self.set_visible_range(offset, self.view.z_visible_region)
    }

    /// Restore the window to the matrix value range.
    pub fn reset_visible_range(&mut self) -> Result<()> {
        let (offset, region) = self.default_window();
        self.set_visible_range(offset, region)
    }

    /// Change the ramp palette.
    pub fn set_palette(&mut self, palette: ColorPalette) {
        if self.palette != palette {
            self.palette = palette;
            self.invalidate();
        }
    }

    /// Drop all cached tiles, e.g. after the matrix was modified externally.
    pub fn flush_tiles(&mut self) {
        self.invalidate();
    }

    /// Cell under screen position `(x, y)`, or `None` off the matrix.
    pub fn inspect(&self, x: i32, y: i32) -> Option<Inspection> {
        let data_x = coords::x_screen_to_data(&self.view, x);
        let data_y = coords::y_screen_to_data(&self.view, y);
        let cell_x = data_x.floor();
        let cell_y = data_y.floor();
        if !self.matrix.contains(cell_x as i64, cell_y as i64) {
            return None;
        }
        let (cell_x, cell_y) = (cell_x as usize, cell_y as usize);
        Some(Inspection {
            x: data_x,
            y: data_y,
            cell_x,
            cell_y,
            value: self.matrix.value_at(cell_x, cell_y),
        })
    }

    /// Make sure every visible tile is rendered for the current generation.
    ///
    /// Returns the number of visible tiles.
    pub fn redraw(&mut self) -> usize {
        let Some(visible) = self.visible_tiles() else {
            return 0;
        };
        let snapshot = self.snapshot();
        self.cache.protect(Some(visible));
        for key in visible.keys() {
            self.cache.get(key, &snapshot, self.matrix.as_ref());
        }
        visible.len()
    }

    /// Rendered color at screen pixel `(x, y)`, if its tile is cached.
    pub fn pixel_at(&self, x: i32, y: i32) -> Option<Rgb> {
        let tx = coords::x_screen_to_tile(&self.view, x);
        let ty = coords::y_screen_to_tile(&self.view, y);
        let key = TileKey::new(tile_index(tx), tile_index(ty));
        let tile = self.cache.peek(key)?;
        if tile.generation() != self.generation {
            return None;
        }
        let col = tx.rem_euclid(TILE_SIDE) as usize;
        let row = (TILE_SIDE - 1 - ty.rem_euclid(TILE_SIDE)) as usize;
        Some(tile.pixel(col, row))
    }

    /// Screen point used for keyboard zooms: the cursor, else the viewport center.
    pub(super) fn zoom_anchor(&self) -> (i32, i32) {
        self.cursor.unwrap_or((self.width / 2, self.height / 2))
    }

    fn default_window(&self) -> (f64, f64) {
        match self.matrix.value_range() {
            Some((min, max)) => {
                let offset = min.min(0.0);
                let region = max - offset;
                if region > 0.0 && region.is_finite() {
                    (offset, region)
                } else {
                    (offset, 1.0)
                }
            },
            None => (0.0, 1.0),
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.cache.invalidate_all();
    }
}
