//! End-to-end checks of the tiled viewer without a terminal.

use matview::config::{Aggregation, CacheConfig, ViewerConfig};
use matview::data::{Matrix, MatrixReader};
use matview::view2d::{
    ColorMapper, ColorPalette, Inspection, ScaleMode, StatusSink, TileKey, ViewportController,
    RAMP_SIZE,
};
use std::io::Write;
use std::sync::Arc;

#[derive(Default)]
struct Recorder {
    viewports: Vec<(i32, i32)>,
    readout: Option<(usize, usize, f64)>,
}

impl StatusSink for Recorder {
    fn show_cursor(&mut self, inspection: Option<&Inspection>) {
        self.readout = inspection.map(|i| (i.cell_x, i.cell_y, i.value));
    }

    fn show_viewport(&mut self, width: i32, height: i32) {
        self.viewports.push((width, height));
    }
}

fn ramp_matrix(side: usize) -> Matrix {
    Matrix::from_fn("ramp", side, side, |x, y| (x + y) as f64)
}

// A 256×256 matrix fitted to 512×512 pixels at zoom 2 spans 4 tiles per axis, 16 in all.
#[test]
fn fitted_matrix_fills_four_by_four_tiles() {
    let mut sink = Recorder::default();
    let mut viewer = ViewportController::new(Arc::new(ramp_matrix(256)), ViewerConfig::default());
    viewer.layout(512, 512, &mut sink);

    assert_eq!(sink.viewports, vec![(512, 512)]);
    assert!((viewer.view().x_zoom - 2.0).abs() < 1e-12);
    assert!((viewer.view().y_zoom - 2.0).abs() < 1e-12);
    assert_eq!(viewer.view().x_tile_offset, 0);
    assert_eq!(viewer.view().y_tile_offset, 511);

    let visible = viewer.visible_tiles().unwrap();
    assert_eq!((visible.x0, visible.x1), (0, 3));
    assert_eq!((visible.y0, visible.y1), (0, 3));

    assert_eq!(viewer.redraw(), 16);
    assert_eq!(viewer.cache().len(), 16);
    assert_eq!(viewer.cache().stats().renders, 16);
    for key in viewer.cache().keys() {
        assert!((0..4).contains(&key.tx) && (0..4).contains(&key.ty));
    }

    // Every pixel of the viewport is now available.
    assert!(viewer.pixel_at(0, 0).is_some());
    assert!(viewer.pixel_at(511, 511).is_some());
}

#[test]
fn panning_back_reuses_cached_tiles() {
    let mut sink = Recorder::default();
    let mut viewer = ViewportController::new(Arc::new(ramp_matrix(256)), ViewerConfig::default());
    viewer.layout(512, 512, &mut sink);
    viewer.redraw();
    let generation = viewer.generation();

    viewer.pan(-100, 0);
    viewer.redraw();
    let after_pan = viewer.cache().stats().renders;
    viewer.pan(100, 0);
    viewer.redraw();

    assert_eq!(viewer.generation(), generation);
    assert_eq!(viewer.cache().stats().renders, after_pan);
    assert_eq!(viewer.cache().stats().flushes, 1);
}

#[test]
fn zoom_flushes_and_re_renders() {
    let mut sink = Recorder::default();
    let mut viewer = ViewportController::new(Arc::new(ramp_matrix(256)), ViewerConfig::default());
    viewer.layout(512, 512, &mut sink);
    viewer.redraw();
    let generation = viewer.generation();

    viewer.zoom_around_cursor(2.0, 256, 256).unwrap();
    assert_eq!(viewer.generation(), generation + 1);
    assert!(viewer.cache().is_empty());
    assert!(viewer.pixel_at(256, 256).is_none());

    viewer.redraw();
    assert!(viewer.pixel_at(256, 256).is_some());
}

#[test]
fn log_scale_maps_zero_to_first_color() {
    let matrix = Matrix::from_fn("sparse", 64, 64, |x, y| if x == 0 && y == 0 { 0.0 } else { 1000.0 });
    let mut sink = Recorder::default();
    let mut viewer = ViewportController::new(Arc::new(matrix), ViewerConfig::default());
    viewer.layout(64, 64, &mut sink);
    viewer.set_scale_mode(ScaleMode::Log);
    assert!(viewer.view().log_scale);
    viewer.redraw();

    let mapper = ColorMapper::from_window(0.0, 1000.0, true, ColorPalette::Classic);
    assert_eq!(mapper.index_for(0.0), 0);
    assert_eq!(mapper.index_for(-5.0), 0);
    assert_eq!(mapper.index_for(1000.0), RAMP_SIZE - 1);

    // Cell (0, 0) sits at the bottom-left pixel.
    assert_eq!(viewer.pixel_at(0, 63), Some(ColorPalette::Classic.color_at(0)));
}

#[test]
fn mean_aggregation_and_tile_cap_are_honored() {
    let config = ViewerConfig {
        cache: CacheConfig {
            weed_margin: 0,
            max_tiles: Some(4),
            aggregation: Aggregation::Mean,
        },
        ..ViewerConfig::default()
    };
    let mut sink = Recorder::default();
    let mut viewer = ViewportController::new(Arc::new(ramp_matrix(256)), config);
    viewer.layout(512, 512, &mut sink);
    assert_eq!(viewer.redraw(), 16);

    // The cap is smaller than the viewport, but no visible tile may go.
    assert_eq!(viewer.cache().len(), 16);
    for y in (0..512).step_by(128) {
        for x in (0..512).step_by(128) {
            assert!(viewer.pixel_at(x, y).is_some(), "pixel ({}, {})", x, y);
        }
    }

    viewer.redraw();
    assert_eq!(viewer.cache().stats().renders, 16);
    assert_eq!(viewer.cache().stats().hits, 16);

    // One tile column scrolls out and is weeded, one new column renders.
    viewer.pan(-128, 0);
    viewer.redraw();
    assert_eq!(viewer.cache().stats().renders, 20);
    assert_eq!(viewer.cache().len(), 16);
    assert!(viewer.pixel_at(511, 0).is_some());
}

#[test]
fn inspection_follows_the_cursor() {
    let mut sink = Recorder::default();
    let mut viewer = ViewportController::new(Arc::new(ramp_matrix(256)), ViewerConfig::default());
    viewer.layout(512, 512, &mut sink);

    let hit = viewer.inspect(10, 511).unwrap();
    assert_eq!((hit.cell_x, hit.cell_y), (5, 0));
    assert_eq!(hit.value, 5.0);
    assert!(viewer.inspect(-1, 0).is_none());
    assert!(viewer.inspect(0, 600).is_none());
    assert!(!viewer.cache().contains(TileKey::new(0, 0)));
}

#[test]
fn text_matrix_loads_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(file, "# two rows").unwrap();
    writeln!(file, "1 2 3").unwrap();
    writeln!(file, "4, 5, 6").unwrap();

    let matrix = MatrixReader::read_file(file.path(), None).unwrap();
    let mut sink = Recorder::default();
    let mut viewer = ViewportController::new(Arc::new(matrix), ViewerConfig::default());
    viewer.layout(300, 200, &mut sink);

    // Row y = 1 is drawn above row y = 0.
    let top = viewer.inspect(0, 0).unwrap();
    assert_eq!((top.cell_x, top.cell_y, top.value), (0, 1, 4.0));
    let bottom_right = viewer.inspect(299, 199).unwrap();
    assert_eq!(bottom_right.value, 3.0);
}
