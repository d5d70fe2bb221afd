use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    TurnLeft,
    TurnRight,
}

impl Action {
    #[cfg(test)]
    pub const ALL: [Action; 4] = [
        Action::Forward,
        Action::Back,
        Action::TurnLeft,
        Action::TurnRight,
    ];

    /// Physical keys bound to this action. WASD first, arrows as aliases.
    pub fn keys(self) -> [KeyCode; 2] {
        match self {
            Action::Forward => [KeyCode::KeyW, KeyCode::ArrowUp],
            Action::Back => [KeyCode::KeyS, KeyCode::ArrowDown],
            Action::TurnLeft => [KeyCode::KeyA, KeyCode::ArrowLeft],
            Action::TurnRight => [KeyCode::KeyD, KeyCode::ArrowRight],
        }
    }
}

/// Polled once per frame by the controller.
pub trait InputSource {
    fn is_held(&self, action: Action) -> bool;
}

/// Held physical keys. Last write wins per key.
#[derive(Debug, Default)]
pub struct KeyState {
    keys_down: HashSet<KeyCode>,
}

impl KeyState {
    pub fn handle(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_down.insert(code);
            }
            ElementState::Released => {
                self.keys_down.remove(&code);
            }
        }
    }

    pub fn clear(&mut self) {
        self.keys_down.clear();
    }
}

impl InputSource for KeyState {
    fn is_held(&self, action: Action) -> bool {
        action.keys().iter().any(|k| self.keys_down.contains(k))
    }
}

/// Fixed set of held actions, for driving the controller without a window.
impl InputSource for HashSet<Action> {
    fn is_held(&self, action: Action) -> bool {
        self.contains(&action)
    }
}
