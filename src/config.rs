//! Tunables for the fill loop and the brush.
use std::time::Duration;

use crate::error::{Error, Result};
use crate::painter::ShapeSelection;

#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct Config {
    /// Minimum color difference before the fill loop paints.
    pub fill_threshold: u32,
    /// Minimum color difference before the brush paints.
    pub brush_threshold: u32,
    /// Fraction of full grid coverage a fill run attempts.
    pub fill_factor: f32,
    /// Starting shape size as a fraction of the larger source side.
    pub initial_size_ratio: f32,
    /// Multiplier applied to the shape size on "add detail".
    pub detail_factor: f32,
    pub min_detail_size: f32,
    /// Half side of the occupancy window around a brush dab.
    pub brush_radius: u32,
    /// Max offset of a dab from the pointer, per axis.
    pub brush_jitter: f32,
    /// Dabs per brush burst.
    pub burst_count: usize,
    /// Pointer moves shorter than this are ignored.
    pub min_pointer_move: f32,
    pub debounce: Duration,
    pub burst_pause: Duration,
    /// 1 (slowest) to 100 (no pause between painted shapes).
    pub speed: u32,
    /// Output width over source width.
    pub scale: f32,
    pub shapes: ShapeSelection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fill_threshold: 30,
            brush_threshold: 10,
            fill_factor: 0.95,
            initial_size_ratio: 0.4,
            detail_factor: 0.7,
            min_detail_size: 5.0,
            brush_radius: 30,
            brush_jitter: 15.0,
            burst_count: 3,
            min_pointer_move: 5.0,
            debounce: Duration::from_millis(1),
            burst_pause: Duration::from_millis(10),
            speed: 100,
            scale: 1.0,
            shapes: ShapeSelection::default(),
        }
    }
}

impl Config {
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_shapes(mut self, shapes: ShapeSelection) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_fill_factor(mut self, fill_factor: f32) -> Self {
        self.fill_factor = fill_factor;
        self
    }

    pub fn with_thresholds(mut self, fill: u32, brush: u32) -> Self {
        self.fill_threshold = fill;
        self.brush_threshold = brush;
        self
    }

    /// Pause after each painted shape of a fill run.
    pub fn paint_pause(&self) -> Duration {
        Duration::from_millis(100u64.saturating_sub(self.speed as u64))
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.speed) {
            return Err(Error::InvalidConfig("speed must be within 1..=100".into()));
        }
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(Error::InvalidConfig("scale must be > 0".into()));
        }
        if !(self.fill_factor > 0.0 && self.fill_factor.is_finite()) {
            return Err(Error::InvalidConfig("fill_factor must be > 0".into()));
        }
        if !(self.initial_size_ratio > 0.0 && self.initial_size_ratio <= 1.0) {
            return Err(Error::InvalidConfig("initial_size_ratio must be within (0, 1]".into()));
        }
        if !(self.detail_factor > 0.0 && self.detail_factor < 1.0) {
            return Err(Error::InvalidConfig("detail_factor must be within (0, 1)".into()));
        }
        if self.min_detail_size < 1.0 {
            return Err(Error::InvalidConfig("min_detail_size must be >= 1".into()));
        }

        Ok(())
    }
}
