//! Day-before reminder scheduling
//!
//! Each event gets one one-shot timer that fires at the configured local hour
//! on the day before the event. Fire times are computed in the configured
//! timezone so daylight-saving changes never shift the wall-clock hour.
//!
//! Arming is not deduplicated: call [`ReminderScheduler::arm`] exactly once
//! per freshly loaded event set. Arming the same events twice before they
//! fire sends every reminder twice.
//!
//! Timers sleep in bounded slices and re-check the wall clock after each one,
//! so a suspended host or a clock step never makes a reminder fire early or
//! hours late.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Timers resync against the wall clock instead of one long sleep
//! - 1.0.0: Initial release with zoned fire times and a job table

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use dashmap::DashMap;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::notifier::Notifier;
use crate::features::events::Event;

/// Lifecycle of one reminder job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Timer running, not yet fired
    Armed,
    /// Fired once; terminal
    Fired,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Armed => write!(f, "armed"),
            JobState::Fired => write!(f, "fired"),
        }
    }
}

/// One pending or completed reminder
#[derive(Debug, Clone)]
pub struct ReminderJob {
    pub id: Uuid,
    pub event: Event,
    pub fire_at: DateTime<Tz>,
    pub state: JobState,
}

/// Longest single sleep before a timer re-checks the wall clock
pub const MAX_SLEEP: Duration = Duration::from_secs(60 * 60);

/// Time left until `fire_at` as seen at `now`, capped at [`MAX_SLEEP`]
///
/// Returns `None` once the fire time has been reached.
pub fn next_sleep(fire_at: DateTime<Tz>, now: DateTime<Utc>) -> Option<Duration> {
    let left = (fire_at.with_timezone(&Utc) - now).to_std().ok()?;
    if left.is_zero() {
        return None;
    }
    Some(left.min(MAX_SLEEP))
}

/// Local instant one calendar day before `date` at `hour:00` in `timezone`
///
/// Repeated local hours resolve to the earlier instant. A local hour that
/// does not exist (spring-forward gap) moves to the first valid hour after it.
pub fn fire_time(date: NaiveDate, hour: u32, timezone: &Tz) -> Option<DateTime<Tz>> {
    let mut local = date.pred_opt()?.and_hms_opt(hour, 0, 0)?;
    for _ in 0..4 {
        if let Some(at) = timezone.from_local_datetime(&local).earliest() {
            return Some(at);
        }
        local += chrono::Duration::hours(1);
    }
    None
}

/// Arms one-shot reminder timers and tracks their state
pub struct ReminderScheduler {
    notifier: Arc<Notifier>,
    timezone: Tz,
    notification_hour: u32,
    jobs: Arc<DashMap<Uuid, ReminderJob>>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<Notifier>, timezone: Tz, notification_hour: u32) -> Result<Self> {
        if notification_hour > 23 {
            return Err(anyhow!(
                "notification hour must be between 0 and 23, got {notification_hour}"
            ));
        }
        Ok(Self {
            notifier,
            timezone,
            notification_hour,
            jobs: Arc::new(DashMap::new()),
        })
    }

    /// Fire time for an event on `date`, without arming anything
    pub fn fire_time(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        fire_time(date, self.notification_hour, &self.timezone)
    }

    /// Arm a timer for every event whose fire time is strictly after `now`
    ///
    /// Past-due events are skipped, never fired late. Returns the number of
    /// jobs armed. Must be called from within a Tokio runtime.
    pub fn arm(&self, events: &[Event], now: DateTime<Tz>) -> usize {
        let mut armed = 0;

        for event in events {
            let Some(fire_at) = self.fire_time(event.date) else {
                info!("No valid fire time for '{}' on {}, skipping", event.title, event.date);
                continue;
            };
            if fire_at <= now {
                info!(
                    "Reminder for '{}' ({}) was due at {fire_at}, skipping",
                    event.title, event.date
                );
                continue;
            }

            let delay = (fire_at - now).to_std().unwrap_or_default().min(MAX_SLEEP);
            let id = Uuid::new_v4();
            self.jobs.insert(
                id,
                ReminderJob {
                    id,
                    event: event.clone(),
                    fire_at,
                    state: JobState::Armed,
                },
            );

            let jobs = Arc::clone(&self.jobs);
            let notifier = Arc::clone(&self.notifier);
            let task_event = event.clone();
            tokio::spawn(async move {
                let event = task_event;
                let mut delay = delay;
                loop {
                    tokio::time::sleep(delay).await;
                    match next_sleep(fire_at, Utc::now()) {
                        Some(left) => delay = left,
                        None => break,
                    }
                }
                debug!("Reminder job {id} woke for '{}'", event.title);

                if let Some(mut job) = jobs.get_mut(&id) {
                    job.state = JobState::Fired;
                }
                let report = notifier.deliver(&event).await;
                if !report.is_complete() {
                    info!(
                        "Reminder job {id} finished with {} failed recipients",
                        report.failures.len()
                    );
                }
            });

            info!("Scheduled '{}' for {fire_at}", event.title);
            armed += 1;
        }

        info!("Armed {armed} of {} reminders", events.len());
        armed
    }

    /// Snapshot of every job armed so far, ordered by fire time
    pub fn jobs(&self) -> Vec<ReminderJob> {
        let mut jobs: Vec<ReminderJob> = self.jobs.iter().map(|j| j.value().clone()).collect();
        jobs.sort_by_key(|j| j.fire_at);
        jobs
    }

    /// Number of jobs still waiting to fire
    pub fn pending(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| j.state == JobState::Armed)
            .count()
    }
}
