//! # Slash Commands (/)
//!
//! Command definitions and their registration with Discord.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

/// Name and description of every command the bot answers
pub const COMMANDS: &[(&str, &str)] = &[
    ("start", "Start receiving day-before reminders in this channel"),
    ("stop", "Stop receiving reminders in this channel"),
    ("tomorrow", "Events happening tomorrow"),
    ("upcoming", "Next events of each schedule"),
    ("menu", "Show the command menu"),
];

pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    COMMANDS
        .iter()
        .map(|(name, description)| {
            let mut command = CreateApplicationCommand::default();
            command.name(*name).description(*description);
            command
        })
        .collect()
}

/// Registers all slash commands globally (may take up to an hour to propagate)
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for one guild (instant, for development)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_slash_commands() {
        let commands = create_slash_commands();
        assert_eq!(commands.len(), COMMANDS.len());

        let names: Vec<&str> = commands
            .iter()
            .map(|c| c.0.get("name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["start", "stop", "tomorrow", "upcoming", "menu"]);
    }
}
