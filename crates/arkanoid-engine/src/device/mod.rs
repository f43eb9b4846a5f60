//! GPU device + surface management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue for the game window,
//! configures the surface (swapchain) and hands out per-frame encoders.

mod gpu;

pub use gpu::{drawable_extent, surface_error_action, Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
