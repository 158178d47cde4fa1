//! # Core Module
//!
//! Configuration and Discord response helpers shared by every feature.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod config;
pub mod response;

pub use config::Config;
pub use response::{chunk_for_message, chunk_text, MESSAGE_LIMIT};
