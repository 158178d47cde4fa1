//! Schedule query command handlers
//!
//! Handles: tomorrow, upcoming, menu
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::reply;
use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::features::queries::{render_tomorrow, render_upcoming};

pub const MENU_TEXT: &str = "**Command menu**\n\n\
    📅 `/tomorrow` – events happening tomorrow\n\
    📆 `/upcoming` – next events of each schedule\n\
    ✅ `/start` – receive reminders in this channel\n\
    ⛔ `/stop` – stop reminders in this channel";

/// Handler for read-only schedule views
pub struct ScheduleHandler;

#[async_trait]
impl SlashCommandHandler for ScheduleHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["tomorrow", "upcoming", "menu"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let name = command.data.name.clone();
        debug!("Processing /{name} in channel {}", command.channel_id);

        let text = match name.as_str() {
            "menu" => MENU_TEXT.to_string(),
            "tomorrow" | "upcoming" => {
                let queries = Arc::clone(&ctx.queries);
                let is_tomorrow = name == "tomorrow";
                let result = tokio::task::spawn_blocking(move || {
                    let now = queries.now();
                    if is_tomorrow {
                        queries.tomorrow(&now)
                    } else {
                        queries.upcoming(&now)
                    }
                })
                .await??;

                if is_tomorrow {
                    render_tomorrow(&result, &ctx.classifier)
                } else {
                    render_upcoming(&result, &ctx.classifier)
                }
            }
            _ => return Ok(()),
        };

        reply(serenity_ctx, command, &text).await
    }
}
