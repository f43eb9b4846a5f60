//! Arkanoid engine crate.
//!
//! Owns the platform side of the game: the winit event loop and its single
//! window, the wgpu device/surface pair, frame timing and keyboard input.
//! The game crate plugs into it through [`core::App`].

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
