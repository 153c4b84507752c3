//! Per-tick input snapshot.
//!
//! The core never polls devices. Hosts sample their input once per tick and
//! hand a [`MoveInput`] to [`MoveState::apply_input`].

use serde::{Deserialize, Serialize};

use super::config::MovementConfig;
use super::state::MoveState;

/// Button state flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputButtons(pub u8);

impl InputButtons {
    pub const NONE: Self = Self(0);

    /// Jump button.
    pub const JUMP: Self = Self(1 << 0);

    /// Crouch button.
    pub const DUCK: Self = Self(1 << 1);

    /// Sprint button.
    pub const SPEED: Self = Self(1 << 2);

    /// Check if every button in `other` is set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Press a button.
    #[inline]
    pub fn press(&mut self, button: Self) {
        self.0 |= button.0;
    }

    /// Release a button.
    #[inline]
    pub fn release(&mut self, button: Self) {
        self.0 &= !button.0;
    }

    /// Buttons set in `self` but not in `previous`.
    #[inline]
    pub fn newly_pressed(self, previous: Self) -> Self {
        Self(self.0 & !previous.0)
    }
}

impl std::ops::BitOr for InputButtons {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Input for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveInput {
    /// Forward/backward movement (-1.0 to 1.0).
    /// Positive = forward, negative = backward.
    pub forward_axis: f32,

    /// Strafe left/right (-1.0 to 1.0).
    /// Positive = right, negative = left.
    pub side_axis: f32,

    /// Buttons held this tick.
    pub held: InputButtons,

    /// Buttons that went down this tick.
    pub pressed: InputButtons,
}

impl MoveInput {
    /// Check if any movement input is active.
    #[inline]
    pub fn has_movement_input(&self) -> bool {
        self.forward_axis.abs() > 0.01 || self.side_axis.abs() > 0.01
    }
}

impl MoveState {
    /// Copy a tick's input into the move state.
    ///
    /// - Axes are clamped to [-1, 1].
    /// - `forward_move`/`side_move` are the axis sign times
    ///   `config.acceleration`.
    /// - `wish_jump` latches on press and clears once jump is released.
    /// - Crouch follows the button, or flips on each press with
    ///   `toggle_crouch`.
    pub fn apply_input(&mut self, input: &MoveInput, config: &MovementConfig) {
        self.forward_axis = input.forward_axis.clamp(-1.0, 1.0);
        self.side_axis = input.side_axis.clamp(-1.0, 1.0);

        self.forward_move = axis_sign(self.forward_axis) * config.acceleration;
        self.side_move = axis_sign(self.side_axis) * config.acceleration;

        self.sprinting = input.held.contains(InputButtons::SPEED);

        self.jump_held = input.held.contains(InputButtons::JUMP);
        if input.pressed.contains(InputButtons::JUMP) {
            self.wish_jump = true;
        }
        if !self.jump_held {
            self.wish_jump = false;
        }

        if self.toggle_crouch {
            if input.pressed.contains(InputButtons::DUCK) {
                self.crouching = !self.crouching;
            }
        } else {
            self.crouching = input.held.contains(InputButtons::DUCK);
        }
    }
}

fn axis_sign(axis: f32) -> f32 {
    if axis > 0.0 {
        1.0
    } else if axis < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(buttons: InputButtons) -> MoveInput {
        MoveInput {
            held: buttons,
            pressed: buttons,
            ..Default::default()
        }
    }

    #[test]
    fn test_buttons() {
        let mut buttons = InputButtons::default();
        assert!(!buttons.contains(InputButtons::JUMP));

        buttons.press(InputButtons::JUMP | InputButtons::DUCK);
        assert!(buttons.contains(InputButtons::JUMP));
        assert!(buttons.contains(InputButtons::DUCK));

        buttons.release(InputButtons::JUMP);
        assert!(!buttons.contains(InputButtons::JUMP));
        assert_eq!(
            InputButtons::JUMP.newly_pressed(InputButtons::JUMP),
            InputButtons::NONE
        );
    }

    #[test]
    fn test_axes_map_to_wish_scale() {
        let config = MovementConfig::default();
        let mut state = MoveState::default();

        let input = MoveInput {
            forward_axis: 0.3,
            side_axis: -2.0,
            ..Default::default()
        };
        state.apply_input(&input, &config);

        assert_eq!(state.forward_axis, 0.3);
        assert_eq!(state.side_axis, -1.0);
        assert_eq!(state.forward_move, config.acceleration);
        assert_eq!(state.side_move, -config.acceleration);
    }

    #[test]
    fn test_wish_jump_latches_until_release() {
        let config = MovementConfig::default();
        let mut state = MoveState::default();

        state.apply_input(&press(InputButtons::JUMP), &config);
        assert!(state.wish_jump);

        // Still held, not newly pressed
        let held = MoveInput {
            held: InputButtons::JUMP,
            ..Default::default()
        };
        state.apply_input(&held, &config);
        assert!(state.wish_jump);

        state.apply_input(&MoveInput::default(), &config);
        assert!(!state.wish_jump);
        assert!(!state.jump_held);
    }

    #[test]
    fn test_toggle_crouch() {
        let config = MovementConfig::default();
        let mut state = MoveState {
            toggle_crouch: true,
            ..Default::default()
        };

        state.apply_input(&press(InputButtons::DUCK), &config);
        assert!(state.crouching);

        // Releasing keeps the crouch
        state.apply_input(&MoveInput::default(), &config);
        assert!(state.crouching);

        state.apply_input(&press(InputButtons::DUCK), &config);
        assert!(!state.crouching);
    }

    #[test]
    fn test_hold_crouch_and_sprint() {
        let config = MovementConfig::default();
        let mut state = MoveState::default();

        let input = MoveInput {
            held: InputButtons::DUCK | InputButtons::SPEED,
            ..Default::default()
        };
        state.apply_input(&input, &config);
        assert!(state.crouching);
        assert!(state.sprinting);

        state.apply_input(&MoveInput::default(), &config);
        assert!(!state.crouching);
    }
}
