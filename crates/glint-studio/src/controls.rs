use winit::keyboard::{KeyCode, ModifiersState};

use glint_engine::viewport::{AspectPreset, Extent};

/// Step of the resolution input, in pixels. Shift multiplies it by 8.
const RESOLUTION_STEP: u32 = 8;

/// User actions bound to keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    /// Reload the editor buffer, recompile and rebuild the pipeline.
    Run,
    ToggleMode,
    Preset(AspectPreset),
    /// Grow or shrink the explicit resolution.
    Resolution { dx: i32, dy: i32 },
    Quit,
}

/// Maps a pressed key to an action.
pub fn action_for(code: KeyCode, modifiers: ModifiersState) -> Option<Action> {
    let step = if modifiers.shift_key() {
        RESOLUTION_STEP as i32 * 8
    } else {
        RESOLUTION_STEP as i32
    };

    let action = match code {
        KeyCode::F5 => Action::Run,
        KeyCode::Enter if modifiers.control_key() => Action::Run,
        KeyCode::KeyM => Action::ToggleMode,
        KeyCode::Digit1 => Action::Preset(AspectPreset::Square),
        KeyCode::Digit2 => Action::Preset(AspectPreset::Wide2x1),
        KeyCode::Digit3 => Action::Preset(AspectPreset::Classic3x2),
        KeyCode::Digit4 => Action::Preset(AspectPreset::Widescreen16x9),
        KeyCode::ArrowRight => Action::Resolution { dx: step, dy: 0 },
        KeyCode::ArrowLeft => Action::Resolution { dx: -step, dy: 0 },
        KeyCode::ArrowUp => Action::Resolution { dx: 0, dy: step },
        KeyCode::ArrowDown => Action::Resolution { dx: 0, dy: -step },
        KeyCode::Escape => Action::Quit,
        _ => return None,
    };

    Some(action)
}

/// Bounded numeric input for the explicit resolution.
///
/// Values stay within `1..=max` on both axes, so the viewport never sees a
/// zero or oversized request from it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResolutionInput {
    width: u32,
    height: u32,
    max: u32,
}

impl ResolutionInput {
    pub fn new(initial: Extent, max: u32) -> Self {
        let max = max.max(1);
        Self {
            width: initial.width.clamp(1, max),
            height: initial.height.clamp(1, max),
            max,
        }
    }

    pub fn value(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Applies a step; returns whether the value changed.
    pub fn step(&mut self, dx: i32, dy: i32) -> bool {
        let before = self.value();
        self.width = offset(self.width, dx, self.max);
        self.height = offset(self.height, dy, self.max);
        self.value() != before
    }
}

fn offset(value: u32, delta: i32, max: u32) -> u32 {
    let moved = i64::from(value) + i64::from(delta);
    moved.clamp(1, i64::from(max)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_is_bound_to_f5_and_ctrl_enter() {
        let none = ModifiersState::empty();
        assert_eq!(action_for(KeyCode::F5, none), Some(Action::Run));
        assert_eq!(action_for(KeyCode::Enter, none), None);
        assert_eq!(
            action_for(KeyCode::Enter, ModifiersState::CONTROL),
            Some(Action::Run)
        );
    }

    #[test]
    fn digits_select_presets_in_order() {
        let presets: Vec<_> = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
        ]
        .into_iter()
        .filter_map(|k| action_for(k, ModifiersState::empty()))
        .collect();

        let expected: Vec<_> = AspectPreset::ALL.into_iter().map(Action::Preset).collect();
        assert_eq!(presets, expected);
    }

    #[test]
    fn shift_enlarges_resolution_step() {
        assert_eq!(
            action_for(KeyCode::ArrowLeft, ModifiersState::SHIFT),
            Some(Action::Resolution { dx: -64, dy: 0 })
        );
    }

    #[test]
    fn resolution_input_never_reaches_zero() {
        let mut input = ResolutionInput::new(Extent::new(4, 4), 4096);
        assert!(input.step(-8, -8));
        assert_eq!(input.value(), Extent::new(1, 1));
        assert!(!input.step(-8, 0));
    }

    #[test]
    fn resolution_input_is_capped_at_device_limit() {
        let mut input = ResolutionInput::new(Extent::new(100, 100), 128);
        input.step(64, 0);
        assert_eq!(input.value(), Extent::new(128, 100));
    }

    #[test]
    fn initial_value_is_clamped() {
        let input = ResolutionInput::new(Extent::new(0, 9000), 8192);
        assert_eq!(input.value(), Extent::new(1, 8192));
    }
}
