use glam::{Mat4, Vec3};

use super::Model;
use super::geometry::{cuboid_colors, cuboid_vertices, Geometry, CUBOID_NORMALS, CUBOID_VERTICES, COMPONENTS};

static VERTICES: [f32; CUBOID_VERTICES * COMPONENTS] = cuboid_vertices([0.25, 3.0, 10.0]);
static COLORS: [f32; CUBOID_VERTICES * COMPONENTS] = cuboid_colors([0.55, 0.55, 0.6]);
static GEOMETRY: Geometry = Geometry::new(&VERTICES, &COLORS, &CUBOID_NORMALS);

/// A side wall: a thin 0.5 x 6.0 x 20.0 slab running along Z.
#[derive(Debug, Clone)]
pub struct Wall {
    transform: Mat4,
}

impl Wall {
    pub fn new() -> Self {
        Self { transform: Mat4::IDENTITY }
    }

    /// The two side walls at `x = -offset` and `x = +offset`.
    pub fn sides(offset: f32) -> Vec<Self> {
        [-offset, offset]
            .into_iter()
            .map(|x| {
                let mut wall = Self::new();
                wall.set_transform(wall.transform() * Mat4::from_translation(Vec3::new(x, 0.0, 0.0)));
                wall
            })
            .collect()
    }
}

impl Default for Wall {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for Wall {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_mirror_each_other() {
        let walls = Wall::sides(12.0);
        assert_eq!(walls.len(), 2);
        assert_eq!(walls[0].transform().w_axis.x, -12.0);
        assert_eq!(walls[1].transform().w_axis.x, 12.0);
    }

    #[test]
    fn wall_is_taller_than_the_paddle() {
        let wall = Wall::new();
        let paddle = crate::model::Paddle::new();
        let height = |v: &[f32]| v.chunks_exact(COMPONENTS).map(|p| p[1]).fold(f32::MIN, f32::max);
        assert!(height(wall.vertices()) > height(paddle.vertices()));
    }
}
