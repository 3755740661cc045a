//! Terminal event bus adapter.
//!
//! Implements the EventBus trait by printing to stdout.

use shakeball_events::{
    event_names, AnswerChangedEvent, EventBus, ModeChangedEvent, NoticeEvent, ShakingChangedEvent,
};
use std::io::Write;

/// EventBus implementation that renders events as terminal lines.
pub struct TerminalEventBus {
    json: bool,
}

impl TerminalEventBus {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn render(&self, topic: &str, payload: &serde_json::Value) -> Option<String> {
        if self.json {
            return Some(serde_json::json!({ "topic": topic, "payload": payload }).to_string());
        }

        match topic {
            event_names::ANSWER_CHANGED => {
                let event: AnswerChangedEvent = serde_json::from_value(payload.clone()).ok()?;
                Some(format!("🎱  {}", event.answer))
            }
            event_names::MODE_CHANGED => {
                let event: ModeChangedEvent = serde_json::from_value(payload.clone()).ok()?;
                let mut line = format!("[{}] {}", event.mode, event.instructions);
                if let Some(hint) = event.hint {
                    line.push_str(&format!(" ({})", hint));
                }
                Some(line)
            }
            event_names::SHAKING_CHANGED => {
                let event: ShakingChangedEvent = serde_json::from_value(payload.clone()).ok()?;
                Some(if event.shaking { "~ shaking ~" } else { "~ still ~" }.to_string())
            }
            event_names::NOTICE => {
                let event: NoticeEvent = serde_json::from_value(payload.clone()).ok()?;
                Some(format!("! {}", event.message))
            }
            _ => None,
        }
    }
}

impl EventBus for TerminalEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        let Some(line) = self.render(topic, &payload) else {
            tracing::debug!(topic, "unrendered event");
            return;
        };
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
        let _ = stdout.flush();
    }
}
