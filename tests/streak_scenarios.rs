// tests/streak_scenarios.rs
//
// Whole-path scenarios: evaluator -> status snapshot / daily report.

use std::sync::Arc;

use chrono::{Duration, Utc};

use streak_watch::feed::{FeedEntry, StaticFeed, SCAN_LIMIT};
use streak_watch::status::{self, LABEL_ACTION_REQUIRED, LABEL_SECURED};
use streak_watch::streak::StreakEvaluator;
use streak_watch::{run_daily_check, ReportStatus};

/// 30 newest-first entries by other users, one every 20 minutes.
fn busy_forum() -> Vec<FeedEntry> {
    let now = Utc::now();
    (0..SCAN_LIMIT as i64)
        .map(|i| FeedEntry::new(format!("user{i}"), now - Duration::minutes(20 * i)))
        .collect()
}

fn evaluator(entries: Vec<FeedEntry>) -> StreakEvaluator {
    StreakEvaluator::new(Arc::new(StaticFeed::new("alice", entries)), "toyhouse")
}

#[tokio::test]
async fn alice_fifth_entry_ten_hours_ago_is_secured() {
    let mut entries = busy_forum();
    entries[4] = FeedEntry::new("alice", Utc::now() - Duration::hours(10));
    let ev = evaluator(entries);

    assert!(ev.evaluate("alice").await.streak_secured);

    let snap = status::status(&ev).await;
    assert!(snap.streak_secured);
    assert_eq!(snap.status, LABEL_SECURED);
    assert_eq!(snap.user, "alice");

    let (_, rep) = run_daily_check(&ev).await;
    assert_eq!(rep.status, ReportStatus::Ok);
}

#[tokio::test]
async fn alice_absent_is_pending() {
    let ev = evaluator(busy_forum());

    assert!(!ev.evaluate("alice").await.streak_secured);

    let snap = status::status(&ev).await;
    assert!(!snap.streak_secured);
    assert_eq!(snap.status, LABEL_ACTION_REQUIRED);

    let (result, rep) = run_daily_check(&ev).await;
    assert!(!result.streak_secured);
    assert_eq!(rep.status, ReportStatus::Pending);
}

#[tokio::test]
async fn short_or_empty_feed_is_fine() {
    let ev = evaluator(Vec::new());
    assert!(!ev.evaluate("alice").await.streak_secured);

    let ev = evaluator(vec![FeedEntry::new("alice", Utc::now() - Duration::minutes(5))]);
    assert!(ev.evaluate("alice").await.streak_secured);
}

#[tokio::test]
async fn unreachable_feed_still_yields_snapshot_and_report() {
    let ev = StreakEvaluator::new(Arc::new(StaticFeed::unreachable()), "toyhouse");

    let snap = status::status(&ev).await;
    assert_eq!(snap.subreddit, "toyhouse");
    assert!(!snap.streak_secured);

    let (_, rep) = run_daily_check(&ev).await;
    assert_eq!(rep.status, ReportStatus::Pending);
}

#[tokio::test]
async fn identity_known_but_listing_down() {
    let feed = StaticFeed {
        identity: Some("alice".into()),
        entries: vec![FeedEntry::new("alice", Utc::now())],
        fail_entries: true,
    };
    let ev = StreakEvaluator::new(Arc::new(feed), "toyhouse");
    let snap = status::status(&ev).await;
    assert_eq!(snap.user, "alice");
    assert!(!snap.streak_secured);
}
