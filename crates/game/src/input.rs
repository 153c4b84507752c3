//! Player input handling.
//!
//! This module converts raw key states into the per-tick [`MoveInput`]
//! snapshot the movement core consumes.

use serde::{Deserialize, Serialize};
use surfmove_physics::movement::{InputButtons, MoveInput};

/// Raw player input for a single tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys held.
    pub movement: MovementInput,

    /// Mouse delta this tick (counts, y grows downward).
    pub mouse_delta: (f32, f32),

    /// Action buttons held.
    pub actions: ActionInput,

    /// Tick number this input was generated for.
    pub frame: u32,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub crouch: bool,
    pub sprint: bool,
}

impl PlayerInput {
    /// Buttons held this tick.
    pub fn buttons(&self) -> InputButtons {
        let mut buttons = InputButtons::NONE;
        if self.actions.jump {
            buttons.press(InputButtons::JUMP);
        }
        if self.actions.crouch {
            buttons.press(InputButtons::DUCK);
        }
        if self.actions.sprint {
            buttons.press(InputButtons::SPEED);
        }
        buttons
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward
            || self.movement.backward
            || self.movement.left
            || self.movement.right
    }
}

/// Turns successive [`PlayerInput`]s into [`MoveInput`]s.
///
/// Remembers the previous tick's buttons so presses are reported once, on
/// the tick the button goes down.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputMapper {
    previous: InputButtons,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map one tick of raw input.
    pub fn map(&mut self, input: &PlayerInput) -> MoveInput {
        let held = input.buttons();
        let pressed = held.newly_pressed(self.previous);
        self.previous = held;

        MoveInput {
            forward_axis: axis(input.movement.forward, input.movement.backward),
            side_axis: axis(input.movement.right, input.movement.left),
            held,
            pressed,
        }
    }

    /// Forget held buttons, so the next held button counts as a press.
    pub fn reset(&mut self) {
        self.previous = InputButtons::NONE;
    }
}

/// Opposite keys cancel out.
fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_to_axes() {
        let mut input = PlayerInput::default();
        input.movement.forward = true;
        input.movement.left = true;

        let mapped = InputMapper::new().map(&input);

        assert_eq!(mapped.forward_axis, 1.0);
        assert_eq!(mapped.side_axis, -1.0);
        assert!(input.has_movement());
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = PlayerInput::default();
        input.movement.forward = true;
        input.movement.backward = true;

        let mapped = InputMapper::new().map(&input);

        assert_eq!(mapped.forward_axis, 0.0);
        assert!(!mapped.has_movement_input());
    }

    #[test]
    fn test_press_reported_once() {
        let mut mapper = InputMapper::new();
        let mut input = PlayerInput::default();
        input.actions.jump = true;

        let first = mapper.map(&input);
        assert!(first.pressed.contains(InputButtons::JUMP));
        assert!(first.held.contains(InputButtons::JUMP));

        // Still held on the next tick, no new press
        let second = mapper.map(&input);
        assert!(!second.pressed.contains(InputButtons::JUMP));
        assert!(second.held.contains(InputButtons::JUMP));

        // Release and press again
        input.actions.jump = false;
        mapper.map(&input);
        input.actions.jump = true;
        assert!(mapper.map(&input).pressed.contains(InputButtons::JUMP));
    }

    #[test]
    fn test_reset_repeats_press() {
        let mut mapper = InputMapper::new();
        let mut input = PlayerInput::default();
        input.actions.crouch = true;
        input.actions.sprint = true;

        mapper.map(&input);
        mapper.reset();

        let mapped = mapper.map(&input);
        assert!(mapped.pressed.contains(InputButtons::DUCK | InputButtons::SPEED));
    }
}
