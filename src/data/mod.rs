//! Data reading and representation.
//!
//! This module defines the read-only matrix interface consumed by the viewer
//! and loads matrices from NetCDF or text files.

mod matrix;
mod reader;

pub use matrix::{Matrix, MatrixSource, RangeProvider};
pub use reader::MatrixReader;
