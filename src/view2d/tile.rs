//! Tile keys, rendered tiles and the tile rasterizer.

use super::colormap::{ColorMapper, Rgb};
use super::coords::{tile_origin, TILE_SIDE};
use super::ViewSnapshot;
use crate::config::Aggregation;
use crate::data::MatrixSource;

/// Color of pixels that lie outside the matrix.
pub const BACKGROUND: Rgb = Rgb::new(16, 16, 16);

const SIDE: usize = TILE_SIDE as usize;

/// Position of a tile in the tile grid.
///
/// Ordered by column, then row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Column index (tile-space x divided by the tile side, floored).
    pub tx: i32,
    /// Row index (tile-space y divided by the tile side, floored).
    pub ty: i32,
}

impl TileKey {
    /// Create a key.
    pub const fn new(tx: i32, ty: i32) -> Self {
        Self { tx, ty }
    }
}

/// An immutable rendered tile.
///
/// Pixels are stored row-major with row 0 at the top of the tile, which is
/// the highest tile-space y.
#[derive(Debug, Clone)]
pub struct Tile {
    generation: u64,
    pixels: Box<[Rgb]>,
}

impl Tile {
    /// View generation the tile was rendered under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pixel at column `x`, row `y` (row 0 on top).
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * SIDE + x]
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}

/// Inclusive range of cells covered by one pixel along one axis.
type CellSpan = Option<(usize, usize)>;

/// Rasterizes tiles for one view snapshot.
pub struct TileRenderer<'a> {
    snapshot: &'a ViewSnapshot,
    matrix: &'a dyn MatrixSource,
    mapper: ColorMapper,
    aggregation: Aggregation,
}

impl std::fmt::Debug for TileRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileRenderer")
            .field("snapshot", self.snapshot)
            .field("aggregation", &self.aggregation)
            .finish_non_exhaustive()
    }
}

impl<'a> TileRenderer<'a> {
    /// Create a renderer for `snapshot` over `matrix`.
    pub fn new(
        snapshot: &'a ViewSnapshot,
        matrix: &'a dyn MatrixSource,
        aggregation: Aggregation,
    ) -> Self {
        Self {
            snapshot,
            matrix,
            mapper: ColorMapper::new(snapshot),
            aggregation,
        }
    }

    /// Render the tile at `key`.
    pub fn render(&self, key: TileKey) -> Tile {
        let view = &self.snapshot.view;
        let x0 = tile_origin(key.tx);
        let y_top = tile_origin(key.ty) + TILE_SIDE - 1;

        let columns: Vec<CellSpan> = (0..TILE_SIDE)
            .map(|px| cell_span(x0 + px, view.x_zoom, self.matrix.width()))
            .collect();

        let mut pixels = Vec::with_capacity(SIDE * SIDE);
        for row in 0..TILE_SIDE {
            let rows = cell_span(y_top - row, view.y_zoom, self.matrix.height());
            for cols in &columns {
                let color = match (cols, rows) {
                    (Some(xs), Some(ys)) => self.mapper.color_for(self.aggregate(*xs, ys)),
                    _ => BACKGROUND,
                };
                pixels.push(color);
            }
        }

        Tile {
            generation: self.snapshot.generation,
            pixels: pixels.into_boxed_slice(),
        }
    }

    fn aggregate(&self, (x_lo, x_hi): (usize, usize), (y_lo, y_hi): (usize, usize)) -> f64 {
        match self.aggregation {
            Aggregation::Max => {
                let mut max = f64::NAN;
                for y in y_lo..=y_hi {
                    for x in x_lo..=x_hi {
                        let v = self.matrix.value_at(x, y);
                        if !v.is_nan() && (max.is_nan() || v > max) {
                            max = v;
                        }
                    }
                }
                max
            },
            Aggregation::Mean => {
                let mut sum = 0.0;
                let mut count = 0usize;
                for y in y_lo..=y_hi {
                    for x in x_lo..=x_hi {
                        let v = self.matrix.value_at(x, y);
                        if v.is_finite() {
                            sum += v;
                            count += 1;
                        }
                    }
                }
                if count == 0 {
                    f64::NAN
                } else {
                    sum / count as f64
                }
            },
        }
    }
}

/// Cells of an axis of length `len` covered by tile-space pixel `pos` at `zoom`.
///
/// Zoomed in, several pixels share one cell; zoomed out, one pixel spans
/// several cells. Returns `None` when the pixel lies outside the matrix.
fn cell_span(pos: i32, zoom: f64, len: usize) -> CellSpan {
    // Absorbs rounding when 1/zoom is not exactly representable.
    const EPS: f64 = 1e-9;

    let lo = (pos as f64 / zoom).floor();
    let hi = (((pos + 1) as f64 / zoom - EPS).ceil() - 1.0).max(lo);
    if hi < 0.0 || lo >= len as f64 {
        return None;
    }
    let lo = lo.max(0.0) as usize;
    let hi = (hi as usize).min(len - 1);
    Some((lo, hi))
}
