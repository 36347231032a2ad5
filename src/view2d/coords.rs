//! Conversions between data, tile-grid and screen coordinates.
//!
//! Three frames are involved:
//!
//! - *data* space: matrix cell units, cell `(x, y)` covers `[x, x+1) × [y, y+1)`;
//! - *tile* space: integer pixels at the current zoom, origin at data `(0, 0)`,
//!   y pointing up;
//! - *screen* space: integer viewport pixels, origin top-left, y pointing down.
//!
//! Tile space and screen space differ only by the pan offset, with the
//! vertical axis inverted.

use super::tile::TileKey;
use super::ViewState;

/// Side length of a square tile, in pixels.
pub const TILE_SIDE: i32 = 128;

/// Largest magnitude a pan offset or the zoomed matrix extent may reach.
///
/// Screen and tile coordinates differ by the offset, so keeping both well
/// inside `i32` leaves room for any viewport size.
pub const TILE_SPACE_LIMIT: i32 = 1 << 28;

/// Clamp a pan offset into `[-TILE_SPACE_LIMIT, TILE_SPACE_LIMIT]`.
pub fn clamp_offset(offset: i64) -> i32 {
    offset.clamp(-(TILE_SPACE_LIMIT as i64), TILE_SPACE_LIMIT as i64) as i32
}

/// Tile-grid index containing tile-space pixel `pos`.
///
/// Floors toward negative infinity so that the tiling has no gap or double
/// column around the origin.
pub fn tile_index(pos: i32) -> i32 {
    pos.div_euclid(TILE_SIDE)
}

/// First tile-space pixel of tile-grid index `index`.
pub fn tile_origin(index: i32) -> i32 {
    index * TILE_SIDE
}

/// Remove the horizontal pan offset.
pub fn x_screen_to_tile(view: &ViewState, x: i32) -> i32 {
    x - view.x_tile_offset
}

/// Remove the vertical pan offset and flip the axis.
pub fn y_screen_to_tile(view: &ViewState, y: i32) -> i32 {
    view.y_tile_offset - y
}

/// Inverse of [`x_screen_to_tile`].
pub fn x_tile_to_screen(view: &ViewState, x: i32) -> i32 {
    x + view.x_tile_offset
}

/// Inverse of [`y_screen_to_tile`].
pub fn y_tile_to_screen(view: &ViewState, y: i32) -> i32 {
    view.y_tile_offset - y
}

/// Data coordinate at the lower edge of tile-space pixel `x`.
pub fn x_tile_to_data(view: &ViewState, x: f64) -> f64 {
    x / view.x_zoom
}

/// Data coordinate at the lower edge of tile-space pixel `y`.
pub fn y_tile_to_data(view: &ViewState, y: f64) -> f64 {
    y / view.y_zoom
}

/// Tile-space position of data coordinate `x`.
pub fn x_data_to_tile(view: &ViewState, x: f64) -> f64 {
    x * view.x_zoom
}

/// Tile-space position of data coordinate `y`.
pub fn y_data_to_tile(view: &ViewState, y: f64) -> f64 {
    y * view.y_zoom
}

/// Data x under screen column `x`.
pub fn x_screen_to_data(view: &ViewState, x: i32) -> f64 {
    x_tile_to_data(view, x_screen_to_tile(view, x) as f64)
}

/// Data y under screen row `y`.
pub fn y_screen_to_data(view: &ViewState, y: i32) -> f64 {
    y_tile_to_data(view, y_screen_to_tile(view, y) as f64)
}

/// Screen column of data coordinate `x` (not rounded).
pub fn x_data_to_screen(view: &ViewState, x: f64) -> f64 {
    x_data_to_tile(view, x) + view.x_tile_offset as f64
}

/// Screen row of data coordinate `y` (not rounded).
pub fn y_data_to_screen(view: &ViewState, y: f64) -> f64 {
    view.y_tile_offset as f64 - y_data_to_tile(view, y)
}

/// Inclusive rectangle of tile-grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    /// Leftmost column.
    pub x0: i32,
    /// Bottom row.
    pub y0: i32,
    /// Rightmost column.
    pub x1: i32,
    /// Top row.
    pub y1: i32,
}

impl TileRect {
    /// Tiles intersecting a `width × height` screen viewport.
    ///
    /// Returns `None` for an empty viewport.
    pub fn visible(view: &ViewState, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Self {
            x0: tile_index(x_screen_to_tile(view, 0)),
            x1: tile_index(x_screen_to_tile(view, width - 1)),
            y0: tile_index(y_screen_to_tile(view, height - 1)),
            y1: tile_index(y_screen_to_tile(view, 0)),
        })
    }

    /// Grow by `margin` tiles on every side.
    pub fn expand(self, margin: i32) -> Self {
        Self {
            x0: self.x0 - margin,
            y0: self.y0 - margin,
            x1: self.x1 + margin,
            y1: self.y1 + margin,
        }
    }

    /// Whether `key` lies inside the rectangle.
    pub fn contains(&self, key: TileKey) -> bool {
        (self.x0..=self.x1).contains(&key.tx) && (self.y0..=self.y1).contains(&key.ty)
    }

    /// Number of tiles covered.
    pub fn len(&self) -> usize {
        let w = (self.x1 - self.x0 + 1).max(0) as usize;
        let h = (self.y1 - self.y0 + 1).max(0) as usize;
        w * h
    }

    /// Whether the rectangle covers no tiles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys, row by row from the top.
    pub fn keys(&self) -> impl Iterator<Item = TileKey> + '_ {
        (self.y0..=self.y1)
            .rev()
            .flat_map(move |ty| (self.x0..=self.x1).map(move |tx| TileKey::new(tx, ty)))
    }
}
