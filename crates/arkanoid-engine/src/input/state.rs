use super::frame::InputFrame;
use super::types::{InputEvent, Modifiers};

/// Window-level input state that outlives a single frame.
///
/// winit reports modifiers separately from key events; the tracked value is
/// stamped onto every translated key event.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
}

impl InputState {
    /// Folds `ev` into the tracked state and queues it on `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,
            InputEvent::Key { modifiers, .. } => self.modifiers = *modifiers,
            // Modifier releases are lost while unfocused too.
            InputEvent::Focused(false) => self.modifiers = Modifiers::default(),
            InputEvent::Focused(true) => {}
        }

        frame.push_event(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyState};

    fn key(key: Key, state: KeyState, modifiers: Modifiers) -> InputEvent {
        InputEvent::Key { key, state, modifiers, code: 0, repeat: false }
    }

    #[test]
    fn events_are_queued_in_arrival_order() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::ArrowLeft, KeyState::Pressed, Modifiers::default()));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        state.apply_event(&mut frame, key(Key::ArrowLeft, KeyState::Released, Modifiers::default()));

        assert_eq!(frame.events.len(), 3);
        assert_eq!(frame.events[1], InputEvent::Focused(false));
        assert!(matches!(frame.events[2], InputEvent::Key { state: KeyState::Released, .. }));
    }

    #[test]
    fn modifiers_follow_the_latest_event() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let shift = Modifiers { shift: true, ..Modifiers::default() };

        state.apply_event(&mut frame, InputEvent::ModifiersChanged(shift));
        assert_eq!(state.modifiers, shift);

        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed, Modifiers::default()));
        assert_eq!(state.modifiers, Modifiers::default());
    }

    #[test]
    fn focus_loss_drops_held_modifiers() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::ModifiersChanged(Modifiers { ctrl: true, ..Modifiers::default() }));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert_eq!(state.modifiers, Modifiers::default());
    }

    #[test]
    fn cleared_frame_starts_empty() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Focused(true));
        frame.clear();
        assert!(frame.events.is_empty());
    }
}
