use anyhow::{anyhow, Result};
use wgpu::SurfaceError;
use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputFrame;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

/// The game window.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

/// Context passed to `core::App::on_start`.
pub struct StartCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a Gpu<'w>,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// `'a` spans the callback; `'w` is the window borrow held by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    /// Events received since the previous frame.
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires a swapchain image, lets `draw` record into it, then submits
    /// and presents.
    ///
    /// `clear` travels on the [`RenderTarget`]; the first pass `draw` opens is
    /// expected to apply it together with its own depth clear. Nothing is
    /// drawn while the window has no area. Recoverable surface errors skip
    /// the frame; an unrecoverable one is returned as an error.
    pub fn render<F>(&mut self, clear: wgpu::Color, draw: F) -> Result<()>
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        if !self.gpu.is_drawable() {
            return Ok(());
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let action = self.gpu.handle_surface_error(&err);
                return skip_or_fail(err, action);
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.size(),
        );
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, clear);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        Ok(())
    }
}

/// Turns a failed acquire into "skip this frame" or a fatal error.
fn skip_or_fail(err: SurfaceError, action: SurfaceErrorAction) -> Result<()> {
    match action {
        SurfaceErrorAction::Fatal => Err(anyhow!("unrecoverable surface error: {err}")),
        SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
            log::warn!("surface error, frame skipped: {err}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::surface_error_action;

    fn outcome(err: SurfaceError) -> Result<()> {
        let action = surface_error_action(&err);
        skip_or_fail(err, action)
    }

    #[test]
    fn out_of_memory_fails_the_frame() {
        let err = outcome(SurfaceError::OutOfMemory).unwrap_err();
        assert!(err.to_string().contains("unrecoverable surface error"));
    }

    #[test]
    fn recoverable_errors_skip_the_frame() {
        for err in [SurfaceError::Lost, SurfaceError::Outdated, SurfaceError::Timeout, SurfaceError::Other] {
            assert!(outcome(err).is_ok());
        }
    }
}
