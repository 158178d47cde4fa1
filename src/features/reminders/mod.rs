//! # Reminders Feature
//!
//! Day-before reminders for schedule events, delivered to every subscribed
//! channel.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod notifier;
pub mod scheduler;
pub mod transport;

pub use notifier::{DeliveryFailure, DeliveryReport, Notifier};
pub use scheduler::{fire_time, JobState, ReminderJob, ReminderScheduler};
pub use transport::{DiscordTransport, TimeoutTransport, Transport};
