//! Renderer-facing handles.
//!
//! Renderers own their GPU resources (pipelines, buffers, depth targets) and
//! record into the [`RenderTarget`] handed to them for the current frame.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
