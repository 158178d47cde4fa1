//! Subscription command handlers
//!
//! Handles: start, stop
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::error;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::reply;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::features::subscribers::RecipientId;

const STORE_FAILURE: &str =
    "❌ Sorry, I couldn't update the subscriber list right now. Please try again.";

/// Handler for subscribing and unsubscribing the invoking channel
pub struct SubscriptionHandler;

#[async_trait]
impl SlashCommandHandler for SubscriptionHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["start", "stop"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let recipient = RecipientId(command.channel_id.0);

        let text = match command.data.name.as_str() {
            "start" => match ctx.store.add(recipient).await {
                Ok(added) => subscribe_reply(added, ctx.notification_hour),
                Err(e) => {
                    error!("Failed to subscribe {recipient}: {e:#}");
                    STORE_FAILURE.to_string()
                }
            },
            "stop" => match ctx.store.remove(recipient).await {
                Ok(removed) => unsubscribe_reply(removed),
                Err(e) => {
                    error!("Failed to unsubscribe {recipient}: {e:#}");
                    STORE_FAILURE.to_string()
                }
            },
            _ => return Ok(()),
        };

        reply(serenity_ctx, command, &text).await
    }
}

fn subscribe_reply(added: bool, hour: u32) -> String {
    if added {
        format!(
            "✅ Subscribed! This channel will get reminders at {hour:02}:00 the day before each event. Use `/menu` to see the options."
        )
    } else {
        format!("ℹ️ This channel is already subscribed. Reminders go out at {hour:02}:00 the day before each event.")
    }
}

fn unsubscribe_reply(removed: bool) -> String {
    if removed {
        "👋 This channel was removed and will no longer receive reminders.".to_string()
    } else {
        "ℹ️ This channel was not subscribed.".to_string()
    }
}
