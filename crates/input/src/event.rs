use std::collections::VecDeque;

/// Movement keys the camera responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [
        MoveKey::Forward,
        MoveKey::Back,
        MoveKey::StrafeLeft,
        MoveKey::StrafeRight,
    ];

    fn bit(self) -> u8 {
        match self {
            MoveKey::Forward => 1 << 0,
            MoveKey::Back => 1 << 1,
            MoveKey::StrafeLeft => 1 << 2,
            MoveKey::StrafeRight => 1 << 3,
        }
    }
}

/// Set of movement keys currently held down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys(u8);

impl HeldKeys {
    pub fn press(&mut self, key: MoveKey) {
        self.0 |= key.bit();
    }

    pub fn release(&mut self, key: MoveKey) {
        self.0 &= !key.bit();
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn iter(self) -> impl Iterator<Item = MoveKey> {
        MoveKey::ALL.into_iter().filter(move |k| self.is_held(*k))
    }
}

impl FromIterator<MoveKey> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = MoveKey>>(iter: I) -> Self {
        let mut held = HeldKeys::default();
        for key in iter {
            held.press(key);
        }
        held
    }
}

/// Platform-agnostic input events.
///
/// The window layer translates its callbacks into these and pushes them onto
/// an [`EventQueue`]; the render loop drains the queue once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor position in window pixels.
    CursorMoved { x: f64, y: f64 },
    /// Primary button pressed: a drag gesture begins.
    DragStarted,
    /// Primary button released.
    DragEnded,
    Key { key: MoveKey, pressed: bool },
    /// Window lost focus; held keys are dropped so nothing sticks.
    FocusLost,
}

/// FIFO of input events awaiting the next frame.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Removes and yields every queued event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_press_release() {
        let mut held = HeldKeys::default();
        assert!(held.is_empty());
        held.press(MoveKey::Forward);
        held.press(MoveKey::StrafeRight);
        held.press(MoveKey::Forward);
        assert!(held.is_held(MoveKey::Forward));
        assert!(!held.is_held(MoveKey::Back));
        assert_eq!(
            held.iter().collect::<Vec<_>>(),
            vec![MoveKey::Forward, MoveKey::StrafeRight]
        );
        held.release(MoveKey::Forward);
        assert!(!held.is_held(MoveKey::Forward));
        held.clear();
        assert!(held.is_empty());
    }

    #[test]
    fn queue_drains_in_arrival_order() {
        let mut queue = EventQueue::new();
        queue.push(InputEvent::DragStarted);
        queue.push(InputEvent::CursorMoved { x: 1.0, y: 2.0 });
        queue.push(InputEvent::DragEnded);
        assert_eq!(queue.len(), 3);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                InputEvent::DragStarted,
                InputEvent::CursorMoved { x: 1.0, y: 2.0 },
                InputEvent::DragEnded,
            ]
        );
        assert!(queue.is_empty());
    }
}
