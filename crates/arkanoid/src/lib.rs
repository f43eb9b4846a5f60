//! 3D Arkanoid scene: a paddle under player control, a row of bricks and a
//! camera orbiting the field, rendered with wgpu on top of `arkanoid-engine`.

pub mod config;
pub mod game;
pub mod intent;
pub mod model;
pub mod renderer;
pub mod scene;
pub mod shader;
