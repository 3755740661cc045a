//! Input modes.

use serde::{Deserialize, Serialize};

/// Which input channel currently produces triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Activate key and clicks on the ball.
    #[default]
    KeyboardPointer,
    /// Physical shakes from the motion sensor.
    Motion,
}

impl InputMode {
    /// Stable lowercase name, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            InputMode::KeyboardPointer => "keyboard_pointer",
            InputMode::Motion => "motion",
        }
    }

    /// What to tell the user to do in this mode.
    pub fn instructions(&self) -> &'static str {
        match self {
            InputMode::KeyboardPointer => "Нажми пробел или кликни по шару для предсказания",
            InputMode::Motion => "Задай вопрос и потряси телефон для получения ответа",
        }
    }

    /// Secondary line shown under the instructions, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            InputMode::KeyboardPointer => Some("Режим тестирования активен"),
            InputMode::Motion => None,
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
