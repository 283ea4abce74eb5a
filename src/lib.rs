//! Approximates an image with a mosaic of randomly placed rectangles and
//! circles.
//!
//! A [`fill::FillRun`] samples random square regions of the source, compares
//! their average color with the same region of the output, and paints a shape
//! wherever the difference clears a threshold. A [`brush::Burst`] does the
//! same around the pointer, with shape sizes taken from how much of the
//! output nearby is still background ([`occupancy`]).
#![forbid(unsafe_code)]

pub mod app;
pub mod brush;
pub mod buffer;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod fill;
pub mod occupancy;
pub mod painter;
pub mod source;
pub mod window;

pub use error::{Error, Result};
