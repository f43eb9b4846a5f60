use arkanoid_engine::input::{InputEvent, InputFrame, Key, KeyState};

/// A held directional input along one axis.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Intent {
    Negative,
    #[default]
    Idle,
    Positive,
}

impl Intent {
    /// `-1.0`, `0.0` or `1.0`.
    pub fn sign(self) -> f32 {
        match self {
            Intent::Negative => -1.0,
            Intent::Idle => 0.0,
            Intent::Positive => 1.0,
        }
    }
}

/// What the player is currently asking for.
///
/// Opposite keys on one axis do not cancel: whichever event arrived last
/// decides, and releasing either key stops that axis.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Intents {
    pub paddle_x: Intent,
    pub paddle_z: Intent,
    pub camera_rotation: Intent,
}

impl Intents {
    /// Applies every event of the frame in arrival order.
    pub fn dispatch(&mut self, frame: &InputFrame) {
        for event in &frame.events {
            match event {
                InputEvent::Key { key, state, .. } => self.apply_key(*key, *state),
                InputEvent::Focused(false) => self.reset(),
                _ => {}
            }
        }
    }

    pub fn apply_key(&mut self, key: Key, state: KeyState) {
        match state {
            KeyState::Pressed => match key {
                Key::ArrowLeft => self.paddle_x = Intent::Positive,
                Key::ArrowRight => self.paddle_x = Intent::Negative,
                Key::ArrowUp => self.paddle_z = Intent::Positive,
                Key::ArrowDown => self.paddle_z = Intent::Negative,
                Key::A => self.camera_rotation = Intent::Negative,
                Key::D => self.camera_rotation = Intent::Positive,
                _ => {}
            },
            KeyState::Released => match key {
                Key::ArrowLeft | Key::ArrowRight => self.paddle_x = Intent::Idle,
                Key::ArrowUp | Key::ArrowDown => self.paddle_z = Intent::Idle,
                Key::A | Key::D => self.camera_rotation = Intent::Idle,
                _ => {}
            },
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
