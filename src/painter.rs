//! Random primitive shapes scaled from source space onto the output surface.
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::canvas::Surface;
use crate::color::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

/// The kinds a painter picks from, uniformly by entry. Repeating a kind
/// weights it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeSelection(Vec<ShapeKind>);

impl ShapeSelection {
    /// Returns `None` for an empty list.
    pub fn new(kinds: Vec<ShapeKind>) -> Option<Self> {
        (!kinds.is_empty()).then_some(Self(kinds))
    }

    /// All three kinds, triangle included.
    pub fn with_triangles() -> Self {
        Self(vec![ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Triangle])
    }

    pub fn kinds(&self) -> &[ShapeKind] {
        &self.0
    }

    pub fn pick(&self, rng: &mut impl Rng) -> ShapeKind {
        *self.0.choose(rng).unwrap_or(&ShapeKind::Rectangle)
    }
}

impl Default for ShapeSelection {
    /// Rectangles and circles. Triangles stay out unless asked for.
    fn default() -> Self {
        Self(vec![ShapeKind::Rectangle, ShapeKind::Circle])
    }
}

/// A shape in output coordinates, ready to rasterize.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rectangle { origin: [f32; 2], size: [f32; 2] },
    Circle { center: [f32; 2], radius: f32 },
    Triangle { points: [[f32; 2]; 3] },
}

impl Shape {
    /// Lays out `kind` inside the square of side `side` whose top-left corner
    /// is `origin`, both already in output units.
    pub fn generate(kind: ShapeKind, origin: [f32; 2], side: f32, rng: &mut impl Rng) -> Self {
        let [x, y] = origin;

        match kind {
            ShapeKind::Rectangle => Shape::Rectangle {
                origin,
                size: [side * jitter(rng), side * jitter(rng)],
            },
            ShapeKind::Circle => Shape::Circle {
                center: [x + side / 2.0, y + side / 2.0],
                radius: side / 2.0 * jitter(rng),
            },
            ShapeKind::Triangle => Shape::Triangle {
                points: [[x + side / 2.0, y], [x + side, y + side], [x, y + side]],
            },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Triangle { .. } => ShapeKind::Triangle,
        }
    }

    pub fn draw(&self, surface: &mut impl Surface, color: Color) {
        match self {
            Shape::Rectangle { origin, size } => surface.fill_rect(*origin, *size, color),
            Shape::Circle { center, radius } => surface.fill_circle(*center, *radius, color),
            Shape::Triangle { points } => surface.fill_polygon(points, color),
        }
    }
}

/// Random factor in `[0.5, 1.0]`.
fn jitter(rng: &mut impl Rng) -> f32 {
    rng.random_range(0.5..=1.0)
}

#[derive(Clone, Debug, Default)]
pub struct ShapePainter {
    selection: ShapeSelection,
}

impl ShapePainter {
    pub fn new(selection: ShapeSelection) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> &ShapeSelection {
        &self.selection
    }

    /// Paints one random shape for the source-space square at `position` with
    /// side `source_size`, scaled by `surface.width() / source_width`.
    pub fn paint(
        &self,
        surface: &mut impl Surface,
        source_width: u32,
        position: [f32; 2],
        source_size: f32,
        color: Color,
        rng: &mut impl Rng,
    ) -> Shape {
        let scale = surface.width() as f32 / source_width.max(1) as f32;
        let kind = self.selection.pick(rng);
        let origin = [position[0] * scale, position[1] * scale];

        let shape = Shape::generate(kind, origin, source_size * scale, rng);
        shape.draw(surface, color);
        shape
    }
}
