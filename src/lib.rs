// Core layer - configuration and shared helpers
pub mod core;

// Features layer - events, subscribers, reminders, queries
pub mod features;

// Application layer
pub mod commands;

pub use crate::core::Config;

pub use features::{
    // Events
    CsvEventSource, Event, EventSource, GroupClassifier,
    // Queries
    QueryResult, QueryService,
    // Reminders
    DeliveryReport, DiscordTransport, Notifier, ReminderScheduler, Transport,
    // Subscribers
    RecipientId, RecipientStore,
};
