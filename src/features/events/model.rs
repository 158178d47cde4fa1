//! Event records, normalization and group classification
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with dual date formats and marker-based labels

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

/// Title used when a record has a blank title
pub const UNTITLED: &str = "(untitled)";

/// A record as handed over by an event source, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub date: String,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Originating source, e.g. the schedule file name
    pub group: String,
}

/// A dated, titled schedule entry
///
/// Two loads of the same input produce equal events, so derived reminder
/// jobs are reproducible from one load to the next.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    pub date: NaiveDate,
    pub title: String,
    /// Empty when the source had no location
    pub location: String,
    /// Empty when the source had no description
    pub description: String,
    pub group: String,
}

/// Parse `dd/mm/yyyy` or `dd/mm/yy`
///
/// The year width selects the format, so `10/05/25` is 2025 and never year 25.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let year = text.rsplit('/').next()?;
    let format = match year.len() {
        4 => "%d/%m/%Y",
        2 => "%d/%m/%y",
        _ => return None,
    };
    NaiveDate::parse_from_str(text, format).ok()
}

/// Validate a raw record into an [`Event`]
///
/// Fails only when the date matches neither accepted format.
pub fn normalize(raw: &RawRecord) -> Result<Event> {
    let date = parse_date(&raw.date)
        .ok_or_else(|| anyhow!("Unrecognized date '{}' (expected dd/mm/yyyy or dd/mm/yy)", raw.date))?;

    let title = raw.title.trim();
    let title = if title.is_empty() { UNTITLED } else { title };

    Ok(Event {
        date,
        title: title.to_string(),
        location: raw.location.trim().to_string(),
        description: raw.description.trim().to_string(),
        group: raw.group.clone(),
    })
}

/// Which side of the marker rule a group falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupLabel {
    /// Group identifier contains the marker
    Matched,
    Other,
}

/// Maps group identifiers to display labels by a case-insensitive marker substring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupClassifier {
    marker: String,
    matched_name: String,
    other_name: String,
}

impl GroupClassifier {
    pub fn new(marker: &str, matched_name: &str, other_name: &str) -> Self {
        Self {
            marker: marker.to_lowercase(),
            matched_name: matched_name.to_string(),
            other_name: other_name.to_string(),
        }
    }

    pub fn classify(&self, group: &str) -> GroupLabel {
        if !self.marker.is_empty() && group.to_lowercase().contains(&self.marker) {
            GroupLabel::Matched
        } else {
            GroupLabel::Other
        }
    }

    pub fn label_name(&self, label: GroupLabel) -> &str {
        match label {
            GroupLabel::Matched => &self.matched_name,
            GroupLabel::Other => &self.other_name,
        }
    }

    /// Display label for a group identifier
    pub fn display(&self, group: &str) -> &str {
        self.label_name(self.classify(group))
    }
}

/// Events from one group, in ascending date order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGroup {
    pub group: String,
    pub events: Vec<Event>,
}

/// Bucket events by group, each bucket sorted by date ascending
///
/// Groups appear in order of their earliest event. Events sharing a date keep
/// their load order. Every surface that lists events goes through here so
/// they all agree on ordering.
pub fn group_and_order(events: &[Event]) -> Vec<EventGroup> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let mut groups: Vec<EventGroup> = Vec::new();
    for event in sorted {
        match groups.iter_mut().find(|g| g.group == event.group) {
            Some(existing) => existing.events.push(event.clone()),
            None => groups.push(EventGroup {
                group: event.group.clone(),
                events: vec![event.clone()],
            }),
        }
    }
    groups
}
