//! Immutable RGBA snapshots and region color sampling.
use image::RgbaImage;

use crate::color::Color;

/// Square sampling area in source space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, size: u32) -> Self {
        Self { x, y, size }
    }

    /// Pixel bounds `(x0, y0, x1, y1)` of this region intersected with a
    /// `width` × `height` raster, or `None` when nothing overlaps.
    pub fn clamp_to(self, width: u32, height: u32) -> Option<[u32; 4]> {
        let x1 = self.x.saturating_add(self.size).min(width);
        let y1 = self.y.saturating_add(self.size).min(height);

        (self.x < x1 && self.y < y1).then_some([self.x, self.y, x1, y1])
    }
}

/// Running per-channel sums, shared by every sampler so that rounding and the
/// empty case behave the same on the source and on the output.
#[derive(Default)]
pub(crate) struct ColorSum {
    totals: [u64; 3],
    count: u64,
}

impl ColorSum {
    pub(crate) fn add(&mut self, color: Color) {
        for (total, channel) in self.totals.iter_mut().zip(color) {
            *total += channel as u64;
        }
        self.count += 1;
    }

    /// Rounded mean, or black when nothing was sampled.
    pub(crate) fn mean(&self) -> Color {
        if self.count == 0 {
            return [0, 0, 0];
        }

        self.totals
            .map(|total| ((total * 2 + self.count) / (self.count * 2)) as u8)
    }
}

/// Row-major RGBA pixels captured from a raster. Never mutated after capture.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps raw RGBA bytes. `pixels` must hold `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let [r, g, b] = color;
        let pixels = [r, g, b, 255].repeat(width as usize * height as usize);

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_at(&self, point: [u32; 2]) -> Color {
        let offset = (point[1] as usize * self.width as usize + point[0] as usize) * 4;
        let pixel = &self.pixels[offset..offset + 4];
        [pixel[0], pixel[1], pixel[2]]
    }

    /// Mean color of the pixels inside both `region` and the buffer.
    pub fn average_color(&self, region: Region) -> Color {
        let mut sum = ColorSum::default();

        if let Some([x0, y0, x1, y1]) = region.clamp_to(self.width, self.height) {
            for y in y0..y1 {
                for x in x0..x1 {
                    sum.add(self.color_at([x, y]));
                }
            }
        }

        sum.mean()
    }

    pub fn average_color_whole(&self) -> Color {
        let mut sum = ColorSum::default();

        for pixel in self.pixels.chunks_exact(4) {
            sum.add([pixel[0], pixel[1], pixel[2]]);
        }

        sum.mean()
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        let width = img.width();
        let height = img.height();

        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}
