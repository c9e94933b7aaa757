// src/scheduler.rs
use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::notify::run_daily_check;
use crate::streak::StreakEvaluator;

/// Daily trigger time (UTC).
pub const DAILY_TRIGGER_HOUR: u32 = 23;
pub const DAILY_TRIGGER_MINUTE: u32 = 50;

/// How often the background loop wakes up to look at the clock.
pub const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

pub fn daily_trigger() -> NaiveTime {
    NaiveTime::from_hms_opt(DAILY_TRIGGER_HOUR, DAILY_TRIGGER_MINUTE, 0)
        .unwrap_or_default()
}

/// Once-a-day schedule at a fixed UTC wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
    next_run: DateTime<Utc>,
}

impl DailySchedule {
    pub fn new(at: NaiveTime, now: DateTime<Utc>) -> Self {
        Self {
            at,
            next_run: next_occurrence(at, now),
        }
    }

    pub fn next_run(&self) -> DateTime<Utc> {
        self.next_run
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_run
    }

    /// Move to the first occurrence strictly after `now`.
    pub fn mark_ran(&mut self, now: DateTime<Utc>) {
        self.next_run = next_occurrence(self.at, now);
    }
}

/// First instant at wall-clock `at` that is strictly after `now`.
pub fn next_occurrence(at: NaiveTime, now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

/// Spawn the background loop that runs the daily streak check.
/// The check is awaited inline, so the loop is blocked while it runs.
pub fn spawn_daily_scheduler(evaluator: StreakEvaluator) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut schedule = DailySchedule::new(daily_trigger(), Utc::now());
        tracing::info!(
            target: "scheduler",
            next_run = %schedule.next_run(),
            "scheduler started (daily check at {:02}:{:02} UTC)",
            DAILY_TRIGGER_HOUR,
            DAILY_TRIGGER_MINUTE
        );

        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let now = Utc::now();
            if !schedule.is_due(now) {
                continue;
            }
            let _ = run_daily_check(&evaluator).await;
            schedule.mark_ran(Utc::now());
            tracing::info!(target: "scheduler", next_run = %schedule.next_run(), "daily check scheduled");
        }
    })
}
