// tests/api_http.rs
//
// HTTP-level tests for the dashboard Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /, GET /health  (HTML snapshot)
// - GET /api/status     (JSON contract, incl. degraded feed)

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use streak_watch::feed::{FeedEntry, StaticFeed};
use streak_watch::status::{LABEL_ACTION_REQUIRED, LABEL_SECURED, UNKNOWN_USER};
use streak_watch::streak::StreakEvaluator;
use streak_watch::{router, AppState};

const BODY_LIMIT: usize = 1024 * 1024;

fn app_with(feed: StaticFeed) -> Router {
    let ev = StreakEvaluator::new(Arc::new(feed), "toyhouse");
    router(AppState::new(ev))
}

fn feed_with_alice_post(hours_ago: i64) -> StaticFeed {
    let now = Utc::now();
    StaticFeed::new(
        "alice",
        vec![
            FeedEntry::new("bob", now - Duration::hours(1)),
            FeedEntry::new("alice", now - Duration::hours(hours_ago)),
        ],
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build GET");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let ctype = resp
        .headers()
        .get("content-type")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, ctype, String::from_utf8(bytes).expect("utf8"))
}

#[tokio::test]
async fn api_status_returns_expected_json_fields() {
    let (status, ctype, body) = get(app_with(feed_with_alice_post(10)), "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctype.unwrap_or_default().starts_with("application/json"));

    let v: Json = serde_json::from_str(&body).expect("parse status json");
    assert_eq!(v["user"], "alice");
    assert_eq!(v["subreddit"], "toyhouse");
    assert_eq!(v["streak_secured"], true);
    assert_eq!(v["status"], LABEL_SECURED);

    let ts = v["utc_time"].as_str().expect("utc_time string");
    assert!(
        chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").is_ok(),
        "utc_time must be YYYY-MM-DD HH:MM:SS, got {ts}"
    );
}

#[tokio::test]
async fn api_status_reports_action_required_for_stale_post() {
    let (status, _, body) = get(app_with(feed_with_alice_post(30)), "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    let v: Json = serde_json::from_str(&body).unwrap();
    assert_eq!(v["streak_secured"], false);
    assert_eq!(v["status"], LABEL_ACTION_REQUIRED);
}

#[tokio::test]
async fn api_status_stays_200_when_feed_is_down() {
    let (status, _, body) = get(app_with(StaticFeed::unreachable()), "/api/status").await;
    assert_eq!(status, StatusCode::OK, "dashboard must stay renderable");
    let v: Json = serde_json::from_str(&body).unwrap();
    assert_eq!(v["user"], UNKNOWN_USER);
    assert_eq!(v["streak_secured"], false);
    assert_eq!(v["status"], LABEL_ACTION_REQUIRED);
}

#[tokio::test]
async fn root_and_health_render_html_snapshot() {
    for uri in ["/", "/health"] {
        let (status, ctype, body) = get(app_with(feed_with_alice_post(2)), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri} should be 200");
        assert!(ctype.unwrap_or_default().starts_with("text/html"));
        assert!(body.contains("r/toyhouse streak status"), "{uri}: {body}");
        assert!(body.contains("alice"));
        assert!(body.contains(LABEL_SECURED));
    }
}

#[tokio::test]
async fn health_renders_even_when_feed_is_down() {
    let (status, _, body) = get(app_with(StaticFeed::unreachable()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(LABEL_ACTION_REQUIRED));
}
