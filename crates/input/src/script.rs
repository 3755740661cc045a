//! Line-oriented text format for input events.
//!
//! Used by the terminal driver and by session replays in tests:
//!
//! ```text
//! space                  # activate key
//! key Escape             # any key by code
//! click
//! motion 0.3 9.7 1.2     # timestamped with the caller's clock
//! motion 0.3 - 1.2 1500  # '-' marks a missing axis, trailing value is ts_ms
//! ```
//!
//! An empty line is treated as the activate key.

use crate::error::InputError;
use crate::event::{InputEvent, Key};
use shakeball_motion::MotionSample;

/// Parse one line into an input event.
///
/// `now_ms` stamps motion samples that don't carry their own timestamp.
pub fn parse_event(line: &str, now_ms: i64) -> Result<InputEvent, InputError> {
    let line = line.split('#').next().unwrap_or_default();
    let mut tokens = line.split_whitespace();

    let Some(command) = tokens.next() else {
        return Ok(InputEvent::KeyDown(Key::Space));
    };

    let event = match command.to_ascii_lowercase().as_str() {
        "space" => InputEvent::KeyDown(Key::Space),
        "key" => {
            let code = tokens.next().ok_or(InputError::MissingArgument {
                command: "key",
                argument: "code",
            })?;
            InputEvent::KeyDown(Key::from(code))
        }
        "click" => InputEvent::Click,
        "motion" => {
            let x = parse_axis(tokens.next(), "x")?;
            let y = parse_axis(tokens.next(), "y")?;
            let z = parse_axis(tokens.next(), "z")?;
            let ts_ms = match tokens.next() {
                Some(value) => value.parse().map_err(|_| InputError::InvalidNumber {
                    argument: "ts_ms",
                    value: value.to_string(),
                })?,
                None => now_ms,
            };
            InputEvent::Motion(MotionSample { x, y, z, ts_ms })
        }
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };

    let rest: Vec<_> = tokens.collect();
    if !rest.is_empty() {
        return Err(InputError::Trailing(rest.join(" ")));
    }

    Ok(event)
}

fn parse_axis(token: Option<&str>, argument: &'static str) -> Result<Option<f64>, InputError> {
    let token = token.ok_or(InputError::MissingArgument {
        command: "motion",
        argument,
    })?;
    if token == "-" {
        return Ok(None);
    }
    token
        .parse()
        .map(Some)
        .map_err(|_| InputError::InvalidNumber {
            argument,
            value: token.to_string(),
        })
}
