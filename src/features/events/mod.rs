//! # Events Feature
//!
//! Schedule records turned into typed events, plus the grouping and ordering
//! rules shared by reminders and on-demand queries.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod loader;
pub mod model;

pub use loader::{CsvEventSource, EventSource};
pub use model::{
    group_and_order, normalize, parse_date, Event, EventGroup, GroupClassifier, GroupLabel,
    RawRecord, UNTITLED,
};
