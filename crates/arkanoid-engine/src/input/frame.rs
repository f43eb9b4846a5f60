use super::types::InputEvent;

/// Input collected since the previous frame, in arrival order.
///
/// The runtime clears it after every `App::on_frame`, so each event is seen by
/// exactly one frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
