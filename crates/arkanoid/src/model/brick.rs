use glam::{Mat4, Vec3};

use super::Model;
use super::geometry::{cuboid_colors, cuboid_vertices, Geometry, CUBOID_NORMALS, CUBOID_VERTICES, COMPONENTS};

static VERTICES: [f32; CUBOID_VERTICES * COMPONENTS] = cuboid_vertices([1.8, 0.75, 0.5]);
static COLORS: [f32; CUBOID_VERTICES * COMPONENTS] = cuboid_colors([1.0, 0.45, 0.2]);
static GEOMETRY: Geometry = Geometry::new(&VERTICES, &COLORS, &CUBOID_NORMALS);

/// A brick: 3.6 x 1.5 x 1.0, narrow enough to leave a gap at 4.0 spacing.
#[derive(Debug, Clone)]
pub struct Brick {
    transform: Mat4,
}

impl Brick {
    pub fn new() -> Self {
        Self { transform: Mat4::IDENTITY }
    }

    /// Builds a horizontal row of `count` bricks centered on X = 0, raised by
    /// `height`.
    ///
    /// Placement is fixed here and never touched again.
    pub fn row(count: usize, spacing: f32, height: f32) -> Vec<Self> {
        (0..count)
            .map(|index| {
                let mut brick = Self::new();
                let offset = Vec3::new(row_offset(index, count, spacing), height, 0.0);
                brick.set_transform(brick.transform() * Mat4::from_translation(offset));
                brick
            })
            .collect()
    }
}

impl Default for Brick {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for Brick {
    fn geometry(&self) -> &'static Geometry {
        &GEOMETRY
    }

    fn transform(&self) -> Mat4 {
        self.transform
    }

    fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }
}

/// Offset of brick `index` along the row: `(index - floor(count / 2)) * spacing`.
pub fn row_offset(index: usize, count: usize, spacing: f32) -> f32 {
    (index as f32 - (count / 2) as f32) * spacing
}
