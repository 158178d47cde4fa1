//! Environment-driven configuration for the reminder bot
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with schedule, subscriber and timezone settings

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::features::events::GroupClassifier;

pub const DEFAULT_NOTIFICATION_HOUR: u32 = 14;
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

/// Runtime settings read from the process environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Register commands for this guild only (instant propagation during development)
    pub discord_guild_id: Option<u64>,
    /// Local hour (0-23) at which the day-before reminder fires
    pub notification_hour: u32,
    pub timezone: Tz,
    /// Directory scanned for `*.csv` schedule files
    pub schedules_dir: PathBuf,
    pub subscribers_file: PathBuf,
    pub group_marker: String,
    pub group_label_matched: String,
    pub group_label_other: String,
    pub upcoming_limit: usize,
    pub send_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let discord_token =
            env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set in the environment")?;

        let discord_guild_id = match env::var("DISCORD_GUILD_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("DISCORD_GUILD_ID is not a valid id: {raw}"))?,
            ),
            _ => None,
        };

        let notification_hour = match env::var("NOTIFICATION_HOUR") {
            Ok(raw) => parse_hour(&raw)?,
            Err(_) => DEFAULT_NOTIFICATION_HOUR,
        };

        let timezone = parse_timezone(
            &env::var("TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string()),
        )?;

        let upcoming_limit = match env::var("UPCOMING_LIMIT") {
            Ok(raw) => {
                let limit: usize = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("UPCOMING_LIMIT is not a number: {raw}"))?;
                if limit == 0 {
                    return Err(anyhow!("UPCOMING_LIMIT must be at least 1"));
                }
                limit
            }
            Err(_) => DEFAULT_UPCOMING_LIMIT,
        };

        let send_timeout = match env::var("SEND_TIMEOUT_SECS") {
            Ok(raw) => parse_send_timeout(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECS),
        };

        Ok(Config {
            discord_token,
            discord_guild_id,
            notification_hour,
            timezone,
            schedules_dir: env::var("SCHEDULES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("cronogramas")),
            subscribers_file: env::var("SUBSCRIBERS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("subscribers.json")),
            group_marker: env::var("GROUP_MARKER").unwrap_or_else(|_| "theo".to_string()),
            group_label_matched: env::var("GROUP_LABEL_MATCHED")
                .unwrap_or_else(|_| "Théo".to_string()),
            group_label_other: env::var("GROUP_LABEL_OTHER").unwrap_or_else(|_| "Liz".to_string()),
            upcoming_limit,
            send_timeout,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Classifier built from the configured marker and labels
    pub fn group_classifier(&self) -> GroupClassifier {
        GroupClassifier::new(
            &self.group_marker,
            &self.group_label_matched,
            &self.group_label_other,
        )
    }
}

/// Parse a notification hour, rejecting anything outside 0-23
pub fn parse_hour(raw: &str) -> Result<u32> {
    let hour: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("NOTIFICATION_HOUR is not a number: {raw}"))?;
    if hour > 23 {
        return Err(anyhow!("NOTIFICATION_HOUR must be between 0 and 23, got {hour}"));
    }
    Ok(hour)
}

/// Parse an IANA timezone name such as `America/Sao_Paulo`
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow!("Unknown TIMEZONE '{name}': {e}"))
}

/// Parse a per-send timeout in whole seconds; zero is rejected
pub fn parse_send_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("SEND_TIMEOUT_SECS is not a number: {raw}"))?;
    if secs == 0 {
        return Err(anyhow!("SEND_TIMEOUT_SECS must be at least 1"));
    }
    Ok(Duration::from_secs(secs))
}
