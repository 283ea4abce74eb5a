use crate::buffer::PixelBuffer;

pub type Color = [u8; 3];

const LIGHT_GRAY: u8 = 232;
const DARK_GRAY: u8 = 23;

/// L1 distance over the RGB channels, in `0..=765`.
pub fn color_difference(a: Color, b: Color) -> u32 {
    a.into_iter()
        .zip(b)
        .map(|(a, b)| a.abs_diff(b) as u32)
        .sum()
}

/// True when `current` is far enough from `target` that painting is worth it.
pub fn should_paint(target: Color, current: Color, threshold: u32) -> bool {
    color_difference(target, current) > threshold
}

/// The gray the output starts with. Pixels still equal to it are treated as
/// unpainted by the occupancy estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Background(Color);

impl Background {
    /// Light images get a light gray backdrop, dark images a dark one.
    pub fn from_source(source: &PixelBuffer) -> Self {
        let [r, g, b] = source.average_color_whole();
        let luminance = (r as u32 + g as u32 + b as u32) as f32 / 3.0;
        let level = if luminance > 128.0 { LIGHT_GRAY } else { DARK_GRAY };

        Self([level; 3])
    }

    pub fn color(self) -> Color {
        self.0
    }
}
