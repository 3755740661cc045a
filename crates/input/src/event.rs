//! Raw input events forwarded by the presentation layer.

use serde::{Deserialize, Serialize};
use shakeball_motion::MotionSample;

/// A keyboard key, identified by its physical key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Key {
    #[default]
    Space,
    Enter,
    Escape,
    /// A letter or digit key, lowercased.
    Char(char),
    Other(String),
}

impl Key {
    /// The key code as reported by keyboard events (`"Space"`, `"KeyA"`, ...).
    pub fn code(&self) -> String {
        match self {
            Key::Space => "Space".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Char(c) if c.is_ascii_digit() => format!("Digit{}", c),
            Key::Char(c) => format!("Key{}", c.to_ascii_uppercase()),
            Key::Other(code) => code.clone(),
        }
    }
}

impl From<&str> for Key {
    fn from(code: &str) -> Self {
        match code {
            " " | "Space" | "space" => Key::Space,
            "Enter" | "enter" | "Return" => Key::Enter,
            "Escape" | "escape" | "Esc" | "esc" => Key::Escape,
            _ => {
                let single = |rest: &str| {
                    let mut chars = rest.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) if c.is_ascii_alphanumeric() => {
                            Some(c.to_ascii_lowercase())
                        }
                        _ => None,
                    }
                };
                code.strip_prefix("Key")
                    .or_else(|| code.strip_prefix("Digit"))
                    .and_then(single)
                    .or_else(|| single(code))
                    .map(Key::Char)
                    .unwrap_or_else(|| Key::Other(code.to_string()))
            }
        }
    }
}

impl From<String> for Key {
    fn from(code: String) -> Self {
        Key::from(code.as_str())
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.code()
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A gesture or sensor reading delivered to the arbiter.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    /// Pointer click on the ball surface.
    Click,
    Motion(MotionSample),
}

impl InputEvent {
    pub fn label(&self) -> &'static str {
        match self {
            InputEvent::KeyDown(_) => "keydown",
            InputEvent::Click => "click",
            InputEvent::Motion(_) => "devicemotion",
        }
    }
}
