//! # Pixel Primitives
//!
//! Small compositing building blocks shared by the canvas layers.
//!
//! - [`blend`]: Linear interpolation and source-over compositing

pub mod blend;

pub use blend::*;
