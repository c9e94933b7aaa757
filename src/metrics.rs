use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Can only succeed once per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        describe();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!(
        "streak_checks_total",
        "Streak evaluations, labelled by outcome (secured|missing)."
    );
    describe_counter!(
        "streak_feed_errors_total",
        "Feed or identity lookups that failed during evaluation."
    );
    describe_counter!("streak_daily_runs_total", "Scheduled end-of-day checks.");
    describe_gauge!(
        "streak_last_check_ts",
        "Unix ts of the most recent streak evaluation."
    );
}
