//! Reminder rendering and fan-out to subscribers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with per-recipient failure isolation

use log::{debug, info, warn};
use std::sync::Arc;

use super::transport::Transport;
use crate::features::events::{Event, GroupClassifier};
use crate::features::subscribers::{RecipientId, RecipientStore};

/// A recipient that could not be reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub recipient: RecipientId,
    pub reason: String,
}

/// Outcome of one reminder fan-out. Informational only; nothing is retried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub total: usize,
    pub successes: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sends an event's reminder to every current subscriber
pub struct Notifier {
    store: Arc<RecipientStore>,
    transport: Arc<dyn Transport>,
    classifier: GroupClassifier,
}

impl Notifier {
    pub fn new(
        store: Arc<RecipientStore>,
        transport: Arc<dyn Transport>,
        classifier: GroupClassifier,
    ) -> Self {
        Self {
            store,
            transport,
            classifier,
        }
    }

    /// Reminder text for `event`, labeled with its group classification
    pub fn render(&self, event: &Event) -> String {
        let mut msg = format!(
            "🗓️ **Reminder for tomorrow!** ({})\n\n**Event:** {}\n**Date:** {}",
            self.classifier.display(&event.group),
            event.title,
            event.date.format("%d/%m")
        );
        if !event.location.is_empty() {
            msg.push_str(&format!("\n**Location:** {}", event.location));
        }
        if !event.description.is_empty() {
            msg.push_str(&format!("\n**Description:** {}", event.description));
        }
        msg
    }

    /// Deliver the reminder for `event` to the recipients subscribed right now
    ///
    /// Recipients are tried one after another; a failure is recorded and the
    /// loop moves on. An unreadable store degrades to an empty run.
    pub async fn deliver(&self, event: &Event) -> DeliveryReport {
        let recipients = match self.store.list().await {
            Ok(recipients) => recipients,
            Err(e) => {
                warn!(
                    "Could not load subscribers for '{}', skipping delivery: {e:#}",
                    event.title
                );
                Vec::new()
            }
        };

        let text = self.render(event);
        let mut report = DeliveryReport {
            total: recipients.len(),
            ..Default::default()
        };

        for recipient in recipients {
            match self.transport.send(recipient, &text).await {
                Ok(()) => {
                    debug!("Reminder '{}' sent to {recipient}", event.title);
                    report.successes += 1;
                }
                Err(e) => {
                    warn!("Reminder '{}' failed for {recipient}: {e:#}", event.title);
                    report.failures.push(DeliveryFailure {
                        recipient,
                        reason: format!("{e:#}"),
                    });
                }
            }
        }

        info!(
            "Reminder '{}' delivered to {}/{} recipients",
            event.title, report.successes, report.total
        );
        report
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    /// Records every send and fails for the configured recipients
    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        pub sent: Mutex<Vec<(RecipientId, String)>>,
        pub failing: HashSet<RecipientId>,
    }

    impl RecordingTransport {
        pub fn failing_for(ids: &[RecipientId]) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                failing: ids.iter().copied().collect(),
            }
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, recipient: RecipientId, text: &str) -> Result<()> {
            self.sent.lock().await.push((recipient, text.to_string()));
            if self.failing.contains(&recipient) {
                return Err(anyhow!("chat {recipient} not found"));
            }
            Ok(())
        }
    }

    pub(crate) fn classifier() -> GroupClassifier {
        GroupClassifier::new("theo", "Théo", "Liz")
    }

    fn prova() -> Event {
        Event {
            date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            title: "Prova".to_string(),
            location: String::new(),
            description: String::new(),
            group: "theo_turma".to_string(),
        }
    }

    async fn notifier_with(
        dir: &TempDir,
        ids: &[RecipientId],
        transport: Arc<RecordingTransport>,
    ) -> Notifier {
        let store = Arc::new(RecipientStore::new(dir.path().join("subscribers.json")));
        for id in ids {
            store.add(*id).await.unwrap();
        }
        Notifier::new(store, transport, classifier())
    }

    #[test]
    fn test_render_minimal() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RecipientStore::new(dir.path().join("s.json")));
        let notifier = Notifier::new(store, Arc::new(RecordingTransport::default()), classifier());

        let text = notifier.render(&prova());
        assert_eq!(
            text,
            "🗓️ **Reminder for tomorrow!** (Théo)\n\n**Event:** Prova\n**Date:** 10/05"
        );
    }

    #[test]
    fn test_render_optional_fields() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RecipientStore::new(dir.path().join("s.json")));
        let notifier = Notifier::new(store, Arc::new(RecordingTransport::default()), classifier());

        let mut event = prova();
        event.group = "liz_turma.csv".to_string();
        event.location = "Sala 3".to_string();
        event.description = "Capítulos 1 a 3".to_string();

        let text = notifier.render(&event);
        assert!(text.contains("(Liz)"));
        assert!(text.ends_with("**Location:** Sala 3\n**Description:** Capítulos 1 a 3"));
    }

    #[tokio::test]
    async fn test_deliver_to_all() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(RecordingTransport::default());
        let notifier =
            notifier_with(&dir, &[RecipientId(1), RecipientId(2)], transport.clone()).await;

        let report = notifier.deliver(&prova()).await;

        assert_eq!(report.total, 2);
        assert_eq!(report.successes, 2);
        assert!(report.is_complete());
        let sent = transport.sent.lock().await;
        assert_eq!(sent[0].0, RecipientId(1));
        assert_eq!(sent[1].0, RecipientId(2));
        assert!(sent[0].1.contains("**Event:** Prova"));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(RecordingTransport::failing_for(&[RecipientId(1)]));
        let notifier =
            notifier_with(&dir, &[RecipientId(1), RecipientId(2)], transport.clone()).await;

        let report = notifier.deliver(&prova()).await;

        assert_eq!(report.total, 2);
        assert_eq!(report.successes, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].recipient, RecipientId(1));
        assert!(report.failures[0].reason.contains("not found"));
        assert_eq!(transport.sent.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_recipients_read_at_delivery_time() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(RecordingTransport::default());
        let store = Arc::new(RecipientStore::new(dir.path().join("subscribers.json")));
        let notifier = Notifier::new(store.clone(), transport.clone(), classifier());

        store.add(RecipientId(5)).await.unwrap();
        store.add(RecipientId(6)).await.unwrap();
        store.remove(RecipientId(5)).await.unwrap();

        let report = notifier.deliver(&prova()).await;
        assert_eq!(report.total, 1);
        assert_eq!(transport.sent.lock().await[0].0, RecipientId(6));
    }

    #[tokio::test]
    async fn test_unreadable_store_degrades_to_empty_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subscribers.json");
        std::fs::write(&path, "{broken").unwrap();
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::new(
            Arc::new(RecipientStore::new(path)),
            transport.clone(),
            classifier(),
        );

        let report = notifier.deliver(&prova()).await;
        assert_eq!(report, DeliveryReport::default());
        assert!(transport.sent.lock().await.is_empty());
    }
}
