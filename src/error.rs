//! # Error Types
//!
//! This module defines error types used throughout the placard library.
//!
//! Every failure is recoverable at the point of the triggering action: the
//! operation that returned the error left the canvas in its last good state.

use thiserror::Error;

/// Main error type for placard operations
#[derive(Debug, Error)]
pub enum PlacardError {
    /// Bad style, size, or identifier parameter (prior state retained)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Image data that could not be decoded as a raster
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Export path whose extension does not name a supported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Font data that could not be parsed
    #[error("Invalid font: {0}")]
    InvalidFont(String),

    /// I/O error wrapper (read/write failures, permissions, disk)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, PlacardError>;

impl PlacardError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        PlacardError::InvalidArgument(msg.into())
    }
}
