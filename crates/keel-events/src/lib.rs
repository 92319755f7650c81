//! # Keel Events
//!
//! Prioritized event bus used for lifecycle notifications:
//! - Listeners keyed by event id, sorted by priority
//! - Configurable sort order (low-to-high by default)
//! - Propagation stop from within a listener
//! - Retention of each event's last trigger and its collected results

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod bus;
pub mod event;

pub use bus::{EventBus, SortOrder, DEFAULT_PRIORITY};
pub use event::Event;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bus::{EventBus, SortOrder};
    pub use crate::event::Event;
}
