//! Error types for input parsing.

use thiserror::Error;

/// Errors that can occur while turning a text line into an input event.
#[derive(Debug, Error)]
pub enum InputError {
    /// The line did not start with a known command.
    #[error("unknown input command '{0}' (expected key, space, click or motion)")]
    UnknownCommand(String),

    /// A command was missing a required argument.
    #[error("'{command}' is missing its {argument} argument")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// A numeric argument failed to parse.
    #[error("invalid number '{value}' for {argument}")]
    InvalidNumber {
        argument: &'static str,
        value: String,
    },

    /// Extra tokens after a complete command.
    #[error("unexpected trailing input '{0}'")]
    Trailing(String),
}
