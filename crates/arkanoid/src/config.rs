use std::path::PathBuf;

use arkanoid_engine::window::RuntimeConfig;
use glam::Vec3;
use winit::dpi::LogicalSize;

/// Scene tuning: camera, motion speeds, projection and brick layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Camera position at startup. The camera always looks at the origin.
    pub camera_start: Vec3,

    /// Paddle speed in world units per second.
    pub paddle_speed: f32,

    /// Camera orbit speed in radians per second.
    pub camera_speed: f32,

    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    pub brick_count: usize,
    /// Distance between brick centers along X.
    pub brick_spacing: f32,
    /// Height of the brick row above the paddle plane.
    pub brick_height: f32,

    /// Place a wall on each side of the field.
    pub walls: bool,
    /// Distance of each wall from the center along X.
    pub wall_offset: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera_start: Vec3::new(0.0, 5.0, -20.0),
            paddle_speed: 5.0,
            camera_speed: std::f32::consts::FRAC_PI_2,
            fov_degrees: 50.0,
            near: 1.0,
            far: 50.0,
            brick_count: 5,
            brick_spacing: 4.0,
            brick_height: 4.0,
            walls: false,
            wall_offset: 12.0,
        }
    }
}

/// Top-level game configuration.
///
/// Built with `Default` and adjusted with the builder-style setters.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub width: u32,
    pub height: u32,

    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,

    pub clear_color: wgpu::Color,

    /// Print the live `FPS:` readout on stdout.
    pub show_fps: bool,

    pub scene: SceneConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        let shader_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shader");
        Self {
            title: "Arkanoid".to_string(),
            width: 500,
            height: 500,
            vertex_shader: shader_dir.join("vshader.wgsl"),
            fragment_shader: shader_dir.join("fshader.wgsl"),
            clear_color: wgpu::Color::BLACK,
            show_fps: true,
            scene: SceneConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Points both shader stages at a directory holding `vshader.wgsl` and
    /// `fshader.wgsl`.
    pub fn shader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.vertex_shader = dir.join("vshader.wgsl");
        self.fragment_shader = dir.join("fshader.wgsl");
        self
    }

    pub fn show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    pub fn scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    /// Window settings for the engine runtime.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(f64::from(self.width), f64::from(self.height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_setup() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (500, 500));
        assert_eq!(config.scene.camera_start, Vec3::new(0.0, 5.0, -20.0));
        assert_eq!(config.scene.brick_count, 5);
        assert!(config.vertex_shader.ends_with("shader/vshader.wgsl"));
    }

    #[test]
    fn builder_overrides_window_and_shaders() {
        let config = GameConfig::default()
            .title("test")
            .size(800, 600)
            .shader_dir("/tmp/shaders");

        let runtime = config.runtime_config();
        assert_eq!(runtime.title, "test");
        assert_eq!(runtime.initial_size, LogicalSize::new(800.0, 600.0));
        assert_eq!(config.fragment_shader, PathBuf::from("/tmp/shaders/fshader.wgsl"));
    }
}
