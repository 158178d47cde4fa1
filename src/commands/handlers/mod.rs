//! Slash command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod schedule;
pub mod subscription;

pub use schedule::ScheduleHandler;
pub use subscription::SubscriptionHandler;

use anyhow::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use super::registry::CommandRegistry;
use crate::core::chunk_for_message;

/// Registry with every built-in handler
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(SubscriptionHandler));
    registry.register(Arc::new(ScheduleHandler));
    registry
}

/// Respond to a command, sending overflow past the message limit as follow-ups
pub(crate) async fn reply(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    text: &str,
) -> Result<()> {
    let mut chunks = chunk_for_message(text).into_iter();
    let first = chunks.next().unwrap_or_default();

    command
        .create_interaction_response(&serenity_ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|msg| msg.content(&first))
        })
        .await?;

    for chunk in chunks {
        command
            .create_followup_message(&serenity_ctx.http, |msg| msg.content(&chunk))
            .await?;
    }
    Ok(())
}
