//! The output raster shapes are painted onto.
use std::ops::Range;

use image::{Rgb, RgbImage};

use crate::buffer::{ColorSum, Region};
use crate::color::Color;

/// A drawable raster with pixel read-back. Coordinates are output pixels;
/// a pixel is covered when its center lies inside the shape.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn color_at(&self, point: [u32; 2]) -> Color;

    fn fill_rect(&mut self, origin: [f32; 2], size: [f32; 2], color: Color);
    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color);
    fn fill_polygon(&mut self, points: &[[f32; 2]], color: Color);

    /// Mean color of `region` clamped to the surface.
    fn average_color(&self, region: Region) -> Color {
        let mut sum = ColorSum::default();

        if let Some([x0, y0, x1, y1]) = region.clamp_to(self.width(), self.height()) {
            for y in y0..y1 {
                for x in x0..x1 {
                    sum.add(self.color_at([x, y]));
                }
            }
        }

        sum.mean()
    }
}

/// Pixels whose centers fall in `[min, max)`, clipped to `0..limit`.
fn pixel_span(min: f32, max: f32, limit: u32) -> Range<u32> {
    let start = (min - 0.5).ceil().clamp(0.0, limit as f32) as u32;
    let end = (max - 0.5).ceil().clamp(0.0, limit as f32) as u32;
    start..end.max(start)
}

/// Even-odd ray casting.
fn point_in_polygon(point: [f32; 2], polygon: &[[f32; 2]]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let [px, py] = point;
    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

#[derive(Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: background.repeat(width as usize * height as usize),
        }
    }

    pub fn clear(&mut self, color: Color) {
        for pixel in self.pixels.chunks_exact_mut(3) {
            pixel.copy_from_slice(&color);
        }
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[offset..offset + 3].copy_from_slice(&color);
    }

    /// Fill every pixel in the clipped bounding box whose center passes `inside`.
    fn fill_where(
        &mut self,
        min: [f32; 2],
        max: [f32; 2],
        color: Color,
        inside: impl Fn([f32; 2]) -> bool,
    ) {
        let xs = pixel_span(min[0], max[0], self.width);
        for y in pixel_span(min[1], max[1], self.height) {
            for x in xs.clone() {
                if inside([x as f32 + 0.5, y as f32 + 0.5]) {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }

    /// Packs the pixels as `0RGB` words for the window.
    pub fn encode(&self, buf: &mut [u32]) {
        for (out, pixel) in buf.iter_mut().zip(self.pixels.chunks_exact(3)) {
            *out = u32::from_be_bytes([0, pixel[0], pixel[1], pixel[2]]);
        }
    }

    pub fn to_image(&self) -> RgbImage {
        let mut image = RgbImage::new(self.width, self.height);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgb(self.color_at([x, y]));
        }
        image
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_at(&self, point: [u32; 2]) -> Color {
        let offset = (point[1] as usize * self.width as usize + point[0] as usize) * 3;
        let pixel = &self.pixels[offset..offset + 3];
        [pixel[0], pixel[1], pixel[2]]
    }

    fn fill_rect(&mut self, origin: [f32; 2], size: [f32; 2], color: Color) {
        let max = [origin[0] + size[0], origin[1] + size[1]];
        self.fill_where(origin, max, color, |_| true);
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color) {
        let min = [center[0] - radius, center[1] - radius];
        let max = [center[0] + radius, center[1] + radius];
        self.fill_where(min, max, color, |[x, y]| {
            let (dx, dy) = (x - center[0], y - center[1]);
            dx * dx + dy * dy <= radius * radius
        });
    }

    fn fill_polygon(&mut self, points: &[[f32; 2]], color: Color) {
        if points.len() < 3 {
            return;
        }

        let mut min = [f32::INFINITY; 2];
        let mut max = [f32::NEG_INFINITY; 2];
        for &[x, y] in points {
            min = [min[0].min(x), min[1].min(y)];
            max = [max[0].max(x), max[1].max(y)];
        }

        self.fill_where(min, max, color, |p| point_in_polygon(p, points));
    }
}
