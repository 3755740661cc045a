use std::time::Duration;

/// How long the ball shakes, and ignores further triggers, after a trigger.
pub const COOLDOWN: Duration = Duration::from_millis(1000);

/// Shown before the first answer.
pub const GREETING: &str = "Нажми пробел или кликни по шару!";

/// Shown in place of an answer when motion access was refused.
pub const PERMISSION_DENIED_MESSAGE: &str = "Нужно разрешение на использование датчика движения";
