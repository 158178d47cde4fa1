//! Message transport used by reminder delivery
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Send timeout moved into `TimeoutTransport`, usable with any transport
//! - 1.0.0: Discord channel transport with bounded send timeout

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::features::subscribers::RecipientId;

/// Delivers a text message to one recipient
///
/// Implementations are shared across concurrently firing reminders and must
/// handle their own synchronization.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, recipient: RecipientId, text: &str) -> Result<()>;
}

/// Posts messages to Discord channels over the REST API
pub struct DiscordTransport {
    http: Arc<Http>,
}

impl DiscordTransport {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for DiscordTransport {
    async fn send(&self, recipient: RecipientId, text: &str) -> Result<()> {
        ChannelId(recipient.0).say(&self.http, text).await?;
        Ok(())
    }
}

/// Bounds every send of the wrapped transport
///
/// A send that does not finish within the limit fails with a "timed out"
/// reason so one stalled recipient cannot hold up a reminder firing.
pub struct TimeoutTransport<T> {
    inner: T,
    limit: Duration,
}

impl<T: Transport> TimeoutTransport<T> {
    pub fn new(inner: T, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<T: Transport> Transport for TimeoutTransport<T> {
    async fn send(&self, recipient: RecipientId, text: &str) -> Result<()> {
        match timeout(self.limit, self.inner.send(recipient, text)).await {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "send to {recipient} timed out after {}ms",
                self.limit.as_millis()
            )),
        }
    }
}
