use glam::{Mat4, Quat, Vec3};

use crate::config::SceneConfig;
use crate::intent::Intents;
use crate::model::{Brick, Model, Paddle, Wall};
use crate::renderer::DrawCall;

/// `width / height`, or `1.0` for a zero-height drawable.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Scene state: camera, projection and every placed model.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,

    camera: Vec3,
    aspect: f32,
    projection: Mat4,
    view: Mat4,

    paddle: Paddle,
    bricks: Vec<Brick>,
    walls: Vec<Wall>,
}

impl Scene {
    pub fn new(config: SceneConfig, aspect: f32) -> Self {
        let bricks = Brick::row(config.brick_count, config.brick_spacing, config.brick_height);
        let walls = if config.walls {
            Wall::sides(config.wall_offset)
        } else {
            Vec::new()
        };

        let mut scene = Self {
            camera: config.camera_start,
            aspect: 1.0,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            paddle: Paddle::new(),
            bricks,
            walls,
            config,
        };
        scene.resize(aspect);
        scene.update_camera();
        scene
    }

    /// Sets the aspect ratio used by the projection.
    ///
    /// Non-positive ratios (a zero-width window) keep the previous value.
    pub fn resize(&mut self, aspect: f32) {
        if !(aspect > 0.0 && aspect.is_finite()) {
            log::debug!("ignoring degenerate aspect ratio {aspect}");
            return;
        }
        self.aspect = aspect;
        self.projection = Mat4::perspective_rh(
            self.config.fov_degrees.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        );
    }

    /// Advances the scene by `dt` seconds under the current intents.
    pub fn recalculate(&mut self, dt: f32, intents: &Intents) {
        let angle = self.config.camera_speed * dt * intents.camera_rotation.sign();
        if angle != 0.0 {
            self.camera = Quat::from_rotation_y(angle) * self.camera;
        }
        self.update_camera();

        let step = self.config.paddle_speed * dt;
        let offset = Vec3::new(step * intents.paddle_x.sign(), 0.0, step * intents.paddle_z.sign());
        self.paddle
            .set_transform(self.paddle.transform() * Mat4::from_translation(offset));
    }

    fn update_camera(&mut self) {
        self.view = Mat4::look_at_rh(self.camera, Vec3::ZERO, Vec3::Y);
    }

    /// One draw per model: paddle, then bricks in row order, then walls.
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        let models = std::iter::once(&self.paddle as &dyn Model)
            .chain(self.bricks.iter().map(|b| b as &dyn Model))
            .chain(self.walls.iter().map(|w| w as &dyn Model));

        models
            .map(|model| DrawCall::for_model(model, self.projection, self.view))
            .collect()
    }

    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }
}

#[cfg(test)]
mod tests {
    use arkanoid_engine::input::{Key, KeyState};

    use super::*;
    use crate::intent::Intent;

    fn translation(model: &dyn Model) -> Vec3 {
        model.transform().w_axis.truncate()
    }

    #[test]
    fn aspect_ratio_guards_zero_height() {
        assert_eq!(aspect_ratio(800, 600), 800.0 / 600.0);
        assert_eq!(aspect_ratio(640, 0), 1.0);
        assert_eq!(aspect_ratio(0, 0), 1.0);
    }

    #[test]
    fn paddle_motion_accumulates() {
        let mut scene = Scene::new(SceneConfig::default(), 1.0);
        let intents = Intents {
            paddle_x: Intent::Positive,
            paddle_z: Intent::Negative,
            ..Intents::default()
        };

        scene.recalculate(0.1, &intents);
        scene.recalculate(0.1, &intents);

        let t = translation(scene.paddle());
        assert!((t.x - 1.0).abs() < 1e-5);
        assert_eq!(t.y, 0.0);
        assert!((t.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_dt_moves_nothing() {
        let mut scene = Scene::new(SceneConfig::default(), 1.0);
        let intents = Intents {
            paddle_x: Intent::Positive,
            camera_rotation: Intent::Positive,
            ..Intents::default()
        };
        let camera = scene.camera();

        scene.recalculate(0.0, &intents);
        assert_eq!(scene.paddle().transform(), Mat4::IDENTITY);
        assert_eq!(scene.camera(), camera);
    }

    #[test]
    fn bricks_sit_on_a_row_above_the_paddle() {
        let scene = Scene::new(SceneConfig::default(), 1.0);
        assert_eq!(scene.bricks().len(), 5);
        for (i, brick) in scene.bricks().iter().enumerate() {
            let expected = Vec3::new(4.0 * (i as f32 - 2.0), 4.0, 0.0);
            assert!(translation(brick).abs_diff_eq(expected, 1e-6), "brick {i}");
        }
    }

    #[test]
    fn draw_order_is_paddle_then_bricks() {
        let scene = Scene::new(SceneConfig::default(), 1.0);
        let calls = scene.draw_calls();

        assert_eq!(calls.len(), 6);
        assert_eq!(calls[0].matrices.model, scene.paddle().transform());
        for (call, brick) in calls[1..].iter().zip(scene.bricks()) {
            assert_eq!(call.matrices.model, brick.transform());
        }
    }

    #[test]
    fn walls_are_drawn_last_when_enabled() {
        let config = SceneConfig {
            walls: true,
            ..SceneConfig::default()
        };
        let scene = Scene::new(config, 1.0);
        let calls = scene.draw_calls();

        assert_eq!(calls.len(), 8);
        assert_eq!(calls[6].matrices.model, scene.walls()[0].transform());
        assert_eq!(calls[7].matrices.model, scene.walls()[1].transform());
    }

    #[test]
    fn drawing_twice_without_changes_is_identical() {
        let mut scene = Scene::new(SceneConfig::default(), 1.5);
        scene.recalculate(0.016, &Intents::default());

        let a: Vec<_> = scene.draw_calls().iter().map(|c| c.matrices).collect();
        let b: Vec<_> = scene.draw_calls().iter().map(|c| c.matrices).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn camera_orbit_keeps_radius_and_height() {
        let mut scene = Scene::new(SceneConfig::default(), 1.0);
        let start = scene.camera();
        let intents = Intents {
            camera_rotation: Intent::Positive,
            ..Intents::default()
        };

        // Quarter turn at pi/2 rad/s.
        scene.recalculate(1.0, &intents);
        let camera = scene.camera();

        assert!((camera.length() - start.length()).abs() < 1e-4);
        assert!((camera.y - start.y).abs() < 1e-5);
        assert!(camera.abs_diff_eq(Vec3::new(-20.0, 5.0, 0.0), 1e-4));
    }

    #[test]
    fn view_looks_at_the_origin() {
        let scene = Scene::new(SceneConfig::default(), 1.0);
        let origin = scene.view().transform_point3(Vec3::ZERO);

        // The origin sits straight ahead on the camera's -Z axis.
        assert!(origin.x.abs() < 1e-5);
        assert!(origin.y.abs() < 1e-5);
        assert!((origin.z + scene.camera().length()).abs() < 1e-4);
    }

    #[test]
    fn degenerate_resize_keeps_projection() {
        let mut scene = Scene::new(SceneConfig::default(), 1.0);
        let projection = scene.projection();

        scene.resize(aspect_ratio(0, 600));
        assert_eq!(scene.aspect(), 1.0);
        assert_eq!(scene.projection(), projection);
    }

    #[test]
    fn resize_tap_move_release() {
        let mut scene = Scene::new(SceneConfig::default(), 1.0);
        let mut intents = Intents::default();

        scene.resize(aspect_ratio(800, 600));
        assert!((scene.aspect() - 4.0 / 3.0).abs() < 1e-6);

        intents.apply_key(Key::ArrowLeft, KeyState::Pressed);
        assert_eq!(intents.paddle_x.sign(), 1.0);

        let before = translation(scene.paddle()).x;
        scene.recalculate(0.1, &intents);
        let after = translation(scene.paddle()).x;
        assert!((after - before - 0.5).abs() < 1e-5);

        intents.apply_key(Key::ArrowLeft, KeyState::Released);
        assert_eq!(intents.paddle_x.sign(), 0.0);

        scene.recalculate(0.1, &intents);
        assert_eq!(translation(scene.paddle()).x, after);
    }
}
