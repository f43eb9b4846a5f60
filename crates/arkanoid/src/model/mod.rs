//! Renderable models.
//!
//! A model is a static geometry table shared by every instance of its kind,
//! plus a per-instance transform. Geometry never changes at runtime; only
//! transforms do.

mod brick;
mod geometry;
mod paddle;
mod wall;

use glam::Mat4;

pub use brick::Brick;
pub use geometry::Geometry;
pub use paddle::Paddle;
pub use wall::Wall;

/// Shape + pose contract consumed by the draw step.
pub trait Model {
    /// The variant's shared geometry table.
    fn geometry(&self) -> &'static Geometry;

    fn transform(&self) -> Mat4;

    /// Replaces the pose. No validation: callers compose transforms with
    /// translate/rotate/scale.
    fn set_transform(&mut self, transform: Mat4);

    fn vertex_count(&self) -> u32 {
        self.geometry().vertex_count()
    }

    /// Homogeneous positions, 4 floats per vertex.
    fn vertices(&self) -> &'static [f32] {
        self.geometry().vertices()
    }

    /// RGBA colors, 4 floats per vertex.
    fn colors(&self) -> &'static [f32] {
        self.geometry().colors()
    }

    /// Normals with `w = 0`, 4 floats per vertex.
    fn normals(&self) -> &'static [f32] {
        self.geometry().normals()
    }
}
