use std::io::Write;

use anyhow::{Context, Result};
use arkanoid_engine::core::{App, AppControl, FrameCtx, StartCtx};
use arkanoid_engine::input::InputFrame;
use winit::event::WindowEvent;

use crate::config::GameConfig;
use crate::intent::Intents;
use crate::renderer::{ModelRenderer, DEPTH_FORMAT};
use crate::scene::{aspect_ratio, Scene};
use crate::shader::{Shader, ShaderSource, ShaderTargets};

/// Lifecycle of the game controller.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// Constructed; no window or GPU resources yet.
    Uninitialized,
    /// Shader compiled, frames are being ticked.
    Running,
    /// Resources released. Terminal.
    Terminated,
}

/// Game controller: owns the scene, the current intents and the GPU-side
/// program, and drives them once per frame.
pub struct Game {
    config: GameConfig,
    phase: Phase,

    scene: Scene,
    intents: Intents,

    shader: Option<Shader>,
    renderer: Option<ModelRenderer>,

    fps: FpsReadout,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let scene = Scene::new(
            config.scene.clone(),
            aspect_ratio(config.width, config.height),
        );

        Self {
            fps: FpsReadout::new(config.show_fps),
            config,
            phase: Phase::Uninitialized,
            scene,
            intents: Intents::default(),
            shader: None,
            renderer: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn intents(&self) -> &Intents {
        &self.intents
    }

    /// Applies the frame's input, then advances the scene by `dt`.
    ///
    /// Does nothing once terminated.
    pub fn tick(&mut self, dt: f32, input: &InputFrame) {
        if self.phase == Phase::Terminated {
            return;
        }
        self.intents.dispatch(input);
        self.scene.recalculate(dt, &self.intents);
    }

    /// Releases the program and renderer. Idempotent.
    pub fn terminate(&mut self) {
        if self.phase == Phase::Terminated {
            return;
        }
        self.renderer = None;
        if self.shader.take().is_some() {
            log::debug!("shader released");
        }
        self.fps.finish();
        self.phase = Phase::Terminated;
        log::info!("game terminated");
    }

    fn load_shader(&self, surface_format: wgpu::TextureFormat, device: &wgpu::Device) -> Result<Shader> {
        let source = ShaderSource::load(&self.config.vertex_shader, &self.config.fragment_shader)?;
        let targets = ShaderTargets {
            color: surface_format,
            depth: DEPTH_FORMAT,
        };
        Shader::compile(device, &source, targets).context("failed to build shader program")
    }
}

impl App for Game {
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) -> Result<()> {
        let shader = self.load_shader(ctx.gpu.surface_format(), ctx.gpu.device())?;
        let renderer = ModelRenderer::new(shader.interface())?;

        let size = ctx.gpu.size();
        self.scene.resize(aspect_ratio(size.width, size.height));

        self.shader = Some(shader);
        self.renderer = Some(renderer);
        self.phase = Phase::Running;

        log::info!(
            "game running: {}x{}, {} bricks",
            size.width,
            size.height,
            self.scene.bricks().len()
        );
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::Resized(size) => {
                log::debug!("resized to {}x{}", size.width, size.height);
                self.scene.resize(aspect_ratio(size.width, size.height));
            }
            WindowEvent::CloseRequested => self.terminate(),
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        match self.phase {
            Phase::Running => {}
            Phase::Uninitialized => return Ok(AppControl::Continue),
            Phase::Terminated => return Ok(AppControl::Exit),
        }

        self.fps.show(ctx.time.fps());
        self.tick(ctx.time.dt, ctx.input_frame);

        let calls = self.scene.draw_calls();
        log::trace!("frame {}: {} draws, dt {:.4}", ctx.time.frame_index, calls.len(), ctx.time.dt);

        let (Some(shader), Some(renderer)) = (self.shader.as_ref(), self.renderer.as_mut()) else {
            return Ok(AppControl::Continue);
        };

        ctx.render(self.config.clear_color, |rctx, target| {
            renderer.render(rctx, target, shader, &calls);
        })?;
        Ok(AppControl::Continue)
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Live `FPS:` line on stdout, rewritten in place every frame.
#[derive(Debug)]
struct FpsReadout {
    enabled: bool,
    printed: bool,
}

impl FpsReadout {
    fn new(enabled: bool) -> Self {
        Self { enabled, printed: false }
    }

    fn show(&mut self, fps: f32) {
        if !self.enabled {
            return;
        }
        let mut out = std::io::stdout().lock();
        // Best effort: a closed stdout must not stop the game.
        let _ = out.write_all(format_fps(fps).as_bytes());
        let _ = out.flush();
        self.printed = true;
    }

    /// Moves the cursor off the readout line.
    fn finish(&mut self) {
        if self.printed {
            let _ = writeln!(std::io::stdout());
            self.printed = false;
        }
    }
}

fn format_fps(fps: f32) -> String {
    format!("\rFPS: {fps:.1}")
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use arkanoid_engine::input::{InputEvent, Key, KeyState, Modifiers};
    use arkanoid_engine::time::FrameClock;
    use glam::Vec3;

    use super::*;
    use crate::intent::Intent;
    use crate::model::Model;

    fn quiet() -> GameConfig {
        GameConfig::default().show_fps(false)
    }

    fn key(frame: &mut InputFrame, key: Key, state: KeyState) {
        frame.push_event(InputEvent::Key {
            key,
            state,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        });
    }

    fn paddle_x(game: &Game) -> f32 {
        game.scene().paddle().transform().w_axis.x
    }

    #[test]
    fn starts_uninitialized_with_the_default_scene() {
        let game = Game::new(quiet());
        assert_eq!(game.phase(), Phase::Uninitialized);
        assert_eq!(game.scene().camera(), Vec3::new(0.0, 5.0, -20.0));
        assert_eq!(game.scene().bricks().len(), 5);
        assert_eq!(*game.intents(), Intents::default());
    }

    #[test]
    fn tick_dispatches_input_before_moving() {
        let mut game = Game::new(quiet());
        let mut input = InputFrame::default();
        key(&mut input, Key::ArrowLeft, KeyState::Pressed);

        game.tick(0.1, &input);
        assert_eq!(game.intents().paddle_x, Intent::Positive);
        assert!((paddle_x(&game) - 0.5).abs() < 1e-5);

        // Held key: no new events, motion continues.
        game.tick(0.1, &InputFrame::default());
        assert!((paddle_x(&game) - 1.0).abs() < 1e-5);

        let mut input = InputFrame::default();
        key(&mut input, Key::ArrowLeft, KeyState::Released);
        game.tick(0.1, &input);
        assert!((paddle_x(&game) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn long_frame_moves_by_the_full_elapsed_time() {
        let mut game = Game::new(quiet());
        let mut clock = FrameClock::default();
        let start = Instant::now();
        clock.tick_at(start);

        let mut input = InputFrame::default();
        key(&mut input, Key::ArrowLeft, KeyState::Pressed);
        let ft = clock.tick_at(start + Duration::from_secs(2));
        game.tick(ft.dt, &input);

        // 5 units/s for 2 s.
        assert!((paddle_x(&game) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn close_request_terminates_once() {
        let mut game = Game::new(quiet());
        let control = game.on_window_event(&WindowEvent::CloseRequested);

        assert_eq!(control, AppControl::Continue);
        assert_eq!(game.phase(), Phase::Terminated);

        game.terminate();
        assert_eq!(game.phase(), Phase::Terminated);
    }

    #[test]
    fn terminated_game_ignores_ticks() {
        let mut game = Game::new(quiet());
        game.terminate();

        let mut input = InputFrame::default();
        key(&mut input, Key::ArrowUp, KeyState::Pressed);
        game.tick(1.0, &input);

        assert_eq!(game.scene().paddle().transform(), glam::Mat4::IDENTITY);
    }

    #[test]
    fn resize_event_updates_aspect() {
        let mut game = Game::new(quiet());
        game.on_window_event(&WindowEvent::Resized(winit::dpi::PhysicalSize::new(800, 600)));
        assert!((game.scene().aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn fps_readout_format() {
        assert_eq!(format_fps(60.0), "\rFPS: 60.0");
        assert_eq!(format_fps(f32::INFINITY), "\rFPS: inf");
    }
}
