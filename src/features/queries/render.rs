//! Text rendering for query replies

use super::service::QueryResult;
use crate::features::events::GroupClassifier;

pub const NO_UPCOMING_EVENTS: &str = "📭 No upcoming events found.";
pub const NO_EVENTS_TOMORROW: &str = "📭 There are no events scheduled for tomorrow.";

/// `• dd/mm: title` lines under one heading per group
pub fn render_upcoming(result: &QueryResult, classifier: &GroupClassifier) -> String {
    let QueryResult::Groups(groups) = result else {
        return NO_UPCOMING_EVENTS.to_string();
    };

    groups
        .iter()
        .map(|group| {
            let mut lines = vec![format!(
                "**Upcoming events – {}:**",
                classifier.display(&group.group)
            )];
            for event in &group.events {
                lines.push(format!("• {}: {}", event.date.format("%d/%m"), event.title));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `• title` lines under one heading per group
pub fn render_tomorrow(result: &QueryResult, classifier: &GroupClassifier) -> String {
    let QueryResult::Groups(groups) = result else {
        return NO_EVENTS_TOMORROW.to_string();
    };

    groups
        .iter()
        .map(|group| {
            let mut lines = vec![format!(
                "**Tomorrow's events – {}:**",
                classifier.display(&group.group)
            )];
            for event in &group.events {
                lines.push(format!("• {}", event.title));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
