//! # Command System
//!
//! Slash command (/) handling for subscriptions and schedule queries.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use handlers::create_registry;
pub use registry::CommandRegistry;
pub use slash::{create_slash_commands, register_global_commands, register_guild_commands};
