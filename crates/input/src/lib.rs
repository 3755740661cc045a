//! Input intake for shakeball.
//!
//! Defines the raw events the presentation layer forwards (key presses,
//! clicks, motion samples) and the registry that tracks which of them
//! anything is currently listening for.
//!
//! # Listener discipline
//!
//! - Every subscription is a [`ListenerGuard`]; dropping it detaches.
//! - An input mode holds its subscriptions as one [`ListenerSet`], so
//!   switching modes is "drop the old set, attach the new one".
//! - [`ListenerRegistry::accepts`] lets the dispatcher drop events nobody
//!   listens for, the same way an unsubscribed DOM event goes nowhere.
//!
//! # Example
//!
//! ```
//! use shakeball_input::{parse_event, InputEvent, ListenerKind, ListenerRegistry};
//!
//! let registry = ListenerRegistry::new();
//! let click = parse_event("click", 0).unwrap();
//! assert!(!registry.accepts(&click));
//!
//! let guard = registry.attach(ListenerKind::Click);
//! assert!(registry.accepts(&click));
//! drop(guard);
//! assert!(!registry.accepts(&InputEvent::Click));
//! ```

mod error;
mod event;
mod listener;
mod script;

pub use error::InputError;
pub use event::{InputEvent, Key};
pub use listener::{ListenerGuard, ListenerKind, ListenerRegistry, ListenerSet};
pub use script::parse_event;
