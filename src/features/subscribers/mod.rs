//! # Subscribers Feature
//!
//! Channels registered to receive day-before reminders.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod store;

pub use store::{RecipientId, RecipientStore};
