//! Error types for Matview.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Matview operations.
pub type Result<T> = std::result::Result<T, MatviewError>;

/// Errors that can occur in Matview.
#[derive(Debug, Error)]
pub enum MatviewError {
    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Unsupported file format.
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat {
        /// Offending file extension.
        extension: String,
    },

    /// Failed to read NetCDF file.
    #[error("NetCDF error: {0}")]
    NetCDF(String),

    /// Requested variable does not exist.
    #[error("Variable not found: {name}")]
    VariableNotFound {
        /// Variable name that was requested.
        name: String,
    },

    /// Variable cannot be shown as a matrix.
    #[error("Variable '{name}' has {ndim} dimensions, expected 2")]
    NotTwoDimensional {
        /// Variable name.
        name: String,
        /// Actual number of dimensions.
        ndim: usize,
    },

    /// Malformed text matrix.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Matrix has no cells.
    #[error("Matrix is empty")]
    EmptyMatrix,

    /// Rejected view parameters (non-positive zoom or value window).
    #[error("Invalid view state: {0}")]
    InvalidViewState(String),

    /// Failed to access clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
}

impl MatviewError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Create a VariableNotFound error.
    pub fn variable_not_found(name: impl Into<String>) -> Self {
        Self::VariableNotFound { name: name.into() }
    }

    /// Create a Parse error.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an InvalidViewState error.
    pub fn invalid_view(message: impl Into<String>) -> Self {
        Self::InvalidViewState(message.into())
    }
}

impl From<netcdf::Error> for MatviewError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCDF(err.to_string())
    }
}
