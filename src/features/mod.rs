//! # Features
//!
//! - `events`: schedule records, grouping and ordering
//! - `subscribers`: persisted recipient set
//! - `reminders`: day-before scheduling and delivery
//! - `queries`: tomorrow / upcoming views

pub mod events;
pub mod queries;
pub mod reminders;
pub mod subscribers;

pub use events::{CsvEventSource, Event, EventSource, GroupClassifier};
pub use queries::{QueryResult, QueryService};
pub use reminders::{DeliveryReport, DiscordTransport, Notifier, ReminderScheduler, Transport};
pub use subscribers::{RecipientId, RecipientStore};
