//! Read-only schedule queries: tomorrow's events and upcoming events
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial release

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

use crate::features::events::{group_and_order, Event, EventGroup, EventSource};

/// Result of a grouped query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// Nothing matched in any group
    NoEvents,
    /// Non-empty groups in display order
    Groups(Vec<EventGroup>),
}

impl QueryResult {
    fn from_groups(groups: Vec<EventGroup>) -> Self {
        if groups.is_empty() {
            QueryResult::NoEvents
        } else {
            QueryResult::Groups(groups)
        }
    }
}

/// Up to `limit` earliest events per group dated today or later
pub fn upcoming_by_group<T: TimeZone>(
    events: &[Event],
    now: &DateTime<T>,
    limit: usize,
) -> QueryResult {
    let today = now.date_naive();
    let upcoming: Vec<Event> = events.iter().filter(|e| e.date >= today).cloned().collect();

    let groups = group_and_order(&upcoming)
        .into_iter()
        .map(|mut g| {
            g.events.truncate(limit);
            g
        })
        .collect();
    QueryResult::from_groups(groups)
}

/// Events dated exactly tomorrow, by group
pub fn tomorrow_by_group<T: TimeZone>(events: &[Event], now: &DateTime<T>) -> QueryResult {
    let Some(tomorrow) = now.date_naive().succ_opt() else {
        return QueryResult::NoEvents;
    };
    let matching: Vec<Event> = events
        .iter()
        .filter(|e| e.date == tomorrow)
        .cloned()
        .collect();
    QueryResult::from_groups(group_and_order(&matching))
}

/// Answers queries against a fresh load of the event source
pub struct QueryService {
    source: Arc<dyn EventSource>,
    timezone: Tz,
    upcoming_limit: usize,
}

impl QueryService {
    pub fn new(source: Arc<dyn EventSource>, timezone: Tz, upcoming_limit: usize) -> Self {
        Self {
            source,
            timezone,
            upcoming_limit,
        }
    }

    /// Current time in the configured timezone
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }

    pub fn upcoming(&self, now: &DateTime<Tz>) -> Result<QueryResult> {
        let events = self.source.load_events()?;
        Ok(upcoming_by_group(&events, now, self.upcoming_limit))
    }

    pub fn tomorrow(&self, now: &DateTime<Tz>) -> Result<QueryResult> {
        let events = self.source.load_events()?;
        Ok(tomorrow_by_group(&events, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::America::Sao_Paulo;

    struct FixedSource(Vec<Event>);

    impl EventSource for FixedSource {
        fn load_events(&self) -> Result<Vec<Event>> {
            Ok(self.0.clone())
        }
    }

    fn event(day: u32, title: &str, group: &str) -> Event {
        Event {
            date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            title: title.to_string(),
            location: String::new(),
            description: String::new(),
            group: group.to_string(),
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Tz> {
        Sao_Paulo.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap()
    }

    fn titles(group: &EventGroup) -> Vec<&str> {
        group.events.iter().map(|e| e.title.as_str()).collect()
    }

    fn sample() -> Vec<Event> {
        vec![
            event(12, "Feira", "liz.csv"),
            event(7, "Passado", "liz.csv"),
            event(9, "Prova", "theo.csv"),
            event(8, "Hoje", "liz.csv"),
            event(9, "Trabalho", "liz.csv"),
            event(20, "Passeio", "theo.csv"),
        ]
    }

    #[test]
    fn test_upcoming_includes_today_sorted() {
        let QueryResult::Groups(groups) = upcoming_by_group(&sample(), &at(8, 9), 5) else {
            panic!("expected groups");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, "liz.csv");
        assert_eq!(titles(&groups[0]), vec!["Hoje", "Trabalho", "Feira"]);
        assert_eq!(titles(&groups[1]), vec!["Prova", "Passeio"]);
    }

    #[test]
    fn test_upcoming_caps_each_group() {
        let QueryResult::Groups(groups) = upcoming_by_group(&sample(), &at(1, 9), 2) else {
            panic!("expected groups");
        };
        assert_eq!(titles(&groups[0]), vec!["Passado", "Hoje"]);
        assert_eq!(titles(&groups[1]), vec!["Prova", "Passeio"]);
    }

    #[test]
    fn test_upcoming_none_left() {
        assert_eq!(upcoming_by_group(&sample(), &at(21, 9), 5), QueryResult::NoEvents);
        assert_eq!(upcoming_by_group(&[], &at(1, 9), 5), QueryResult::NoEvents);
    }

    #[test]
    fn test_tomorrow_only_next_day() {
        let QueryResult::Groups(groups) = tomorrow_by_group(&sample(), &at(8, 23)) else {
            panic!("expected groups");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, "theo.csv");
        assert_eq!(titles(&groups[0]), vec!["Prova"]);
        assert_eq!(titles(&groups[1]), vec!["Trabalho"]);
        assert!(groups
            .iter()
            .flat_map(|g| &g.events)
            .all(|e| e.date == NaiveDate::from_ymd_opt(2025, 5, 9).unwrap()));
    }

    #[test]
    fn test_tomorrow_uses_local_date() {
        // 02:30 UTC on the 9th is still the 8th in São Paulo
        let utc = Utc.with_ymd_and_hms(2025, 5, 9, 2, 30, 0).unwrap();
        let local = utc.with_timezone(&Sao_Paulo);
        assert!(matches!(
            tomorrow_by_group(&sample(), &local),
            QueryResult::Groups(_)
        ));
    }

    #[test]
    fn test_tomorrow_nothing_scheduled() {
        assert_eq!(tomorrow_by_group(&sample(), &at(13, 9)), QueryResult::NoEvents);
    }

    #[test]
    fn test_service_loads_fresh() {
        let service = QueryService::new(Arc::new(FixedSource(sample())), Sao_Paulo, 1);
        let QueryResult::Groups(groups) = service.upcoming(&at(8, 9)).unwrap() else {
            panic!("expected groups");
        };
        assert!(groups.iter().all(|g| g.events.len() == 1));
        assert!(matches!(
            service.tomorrow(&at(8, 9)).unwrap(),
            QueryResult::Groups(_)
        ));
    }
}
