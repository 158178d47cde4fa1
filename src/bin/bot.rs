use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use cronograma::commands::{
    create_registry, register_global_commands, register_guild_commands, CommandContext,
    CommandRegistry,
};
use cronograma::core::Config;
use cronograma::features::events::{CsvEventSource, EventSource};
use cronograma::features::queries::QueryService;
use cronograma::features::reminders::{
    DiscordTransport, Notifier, ReminderScheduler, TimeoutTransport,
};
use cronograma::features::subscribers::RecipientStore;

struct Handler {
    registry: CommandRegistry,
    context: Arc<CommandContext>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        // Guild registration is instant; global registration can take up to an hour
        if let Some(guild_id) = self.guild_id {
            info!("🔧 Development mode: Registering commands for guild {guild_id}");
            if let Err(e) = register_guild_commands(&ctx, guild_id).await {
                error!("❌ Failed to register guild slash commands: {e}");
            }
        } else {
            info!("🌍 Production mode: Registering commands globally");
            if let Err(e) = register_global_commands(&ctx).await {
                error!("❌ Failed to register global slash commands: {e}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };

        let Some(handler) = self.registry.get(&command.data.name) else {
            warn!("No handler registered for /{}", command.data.name);
            return;
        };

        if let Err(e) = handler
            .handle(Arc::clone(&self.context), &ctx, &command)
            .await
        {
            error!(
                "Error handling slash command '{}': {e:#}",
                command.data.name
            );
            let _ = command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.content(
                                "❌ Sorry, I encountered an error processing your command. Please try again.",
                            )
                        })
                })
                .await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting schedule reminder bot...");
    info!(
        "⏰ Reminders fire at {:02}:00 ({}) the day before each event",
        config.notification_hour, config.timezone
    );

    let store = Arc::new(RecipientStore::new(&config.subscribers_file));
    match store.list().await {
        Ok(ids) => info!(
            "👥 {} subscribers loaded from {}",
            ids.len(),
            store.path().display()
        ),
        Err(e) => warn!("Subscriber list unreadable, reminders will reach nobody until fixed: {e:#}"),
    }

    let source: Arc<dyn EventSource> = Arc::new(CsvEventSource::new(&config.schedules_dir));
    let classifier = config.group_classifier();
    let queries = Arc::new(QueryService::new(
        Arc::clone(&source),
        config.timezone,
        config.upcoming_limit,
    ));

    let context = Arc::new(CommandContext::new(
        Arc::clone(&store),
        Arc::clone(&queries),
        classifier.clone(),
        config.notification_hour,
    ));
    let handler = Handler {
        registry: create_registry(),
        context,
        guild_id: config.discord_guild_id.map(GuildId),
    };

    let intents = GatewayIntents::GUILDS | GatewayIntents::DIRECT_MESSAGES;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            e
        })?;

    // One arming pass per process: the event set is loaded once here and never re-armed
    let transport = Arc::new(TimeoutTransport::new(
        DiscordTransport::new(client.cache_and_http.http.clone()),
        config.send_timeout,
    ));
    let notifier = Arc::new(Notifier::new(Arc::clone(&store), transport, classifier));
    let scheduler = ReminderScheduler::new(notifier, config.timezone, config.notification_hour)?;
    let events = source.load_events()?;
    let armed = scheduler.arm(&events, queries.now());
    info!("📅 {armed} reminders armed from {} events", events.len());

    info!("Establishing WebSocket connection to Discord gateway...");
    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(why.into());
    }

    Ok(())
}
