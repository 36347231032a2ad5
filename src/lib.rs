//! Matview - a terminal viewer for large two-dimensional matrices.
//!
//! The matrix is rendered through a cache of fixed-size tiles so that
//! panning reuses already drawn pixels and only zoom or contrast changes
//! cost a full re-render.
//!
//! # Features
//!
//! - NetCDF and plain text matrix loading
//! - Tiled rendering with a generation-checked tile cache
//! - Linear and logarithmic color scales with several palettes
//! - Keyboard and mouse navigation with a live value readout
//! - Gruvbox color themes
//! - Clipboard integration
//!
//! # Example
//!
//! ```ignore
//! use matview::config::ViewerConfig;
//! use matview::data::MatrixReader;
//! use matview::view2d::ViewportController;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let matrix = MatrixReader::read_file(Path::new("counts.nc"), None)?;
//! let mut viewer = ViewportController::new(Arc::new(matrix), ViewerConfig::default());
//! viewer.layout(512, 512, &mut sink);
//! let tiles = viewer.redraw();
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod clipboard;
pub mod config;
pub mod data;
pub mod error;
pub mod ui;
pub mod view2d;

pub use error::{MatviewError, Result};
