use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::status::{self, StatusSnapshot};
use crate::streak::StreakEvaluator;

#[derive(Clone)]
pub struct AppState {
    pub evaluator: StreakEvaluator,
}

impl AppState {
    pub fn new(evaluator: StreakEvaluator) -> Self {
        Self { evaluator }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(dashboard))
        .route("/api/status", get(api_status))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let snap = status::status(&state.evaluator).await;
    Html(render_dashboard(&snap))
}

async fn api_status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(status::status(&state.evaluator).await)
}

pub fn render_dashboard(snap: &StatusSnapshot) -> String {
    let body = serde_json::to_string_pretty(snap).unwrap_or_else(|_| format!("{snap:?}"));
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>Streak status</title></head>\
         <body><h1>r/{} streak status</h1><pre>{}</pre></body></html>\n",
        html_escape::encode_text(&snap.subreddit),
        html_escape::encode_text(&body),
    )
}
