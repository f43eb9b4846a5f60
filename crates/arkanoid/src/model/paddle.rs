use glam::Mat4;

use super::Model;
use super::geometry::{cuboid_colors, cuboid_vertices, Geometry, CUBOID_NORMALS, CUBOID_VERTICES, COMPONENTS};

static VERTICES: [f32; CUBOID_VERTICES * COMPONENTS] = cuboid_vertices([1.5, 0.25, 0.5]);
static COLORS: [f32; CUBOID_VERTICES * COMPONENTS] = cuboid_colors([0.25, 0.6, 1.0]);
static GEOMETRY: Geometry = Geometry::new(&VERTICES, &COLORS, &CUBOID_NORMALS);

/// The player's paddle: a flat 3.0 x 0.5 x 1.0 slab.
#[derive(Debug, Clone)]
pub struct Paddle {
    transform: Mat4,
}

impl Paddle {
    pub fn new() -> Self {
        Self { transform: Mat4::IDENTITY }
    }
}

impl Default for Paddle {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for Paddle {
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
