//! Prometheus metrics for the Cardlink backend.
//!
//! HTTP request metrics are recorded by the middleware in
//! `api::middleware::metrics`; domain counters are recorded at the
//! handler call sites.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "http_requests_in_flight";

    pub const CARDS_CREATED_TOTAL: &str = "cards_created_total";
    pub const CARD_VIEWS_TOTAL: &str = "card_views_total";
    pub const LIKES_TOGGLED_TOTAL: &str = "likes_toggled_total";
    pub const SAVES_TOGGLED_TOTAL: &str = "saves_toggled_total";
    pub const RATINGS_SUBMITTED_TOTAL: &str = "ratings_submitted_total";
    pub const ADS_INJECTED_TOTAL: &str = "ads_injected_total";
    pub const PAYMENT_ORDERS_TOTAL: &str = "payment_orders_total";
}

pub mod labels {
    pub const METHOD: &str = "method";
    pub const ENDPOINT: &str = "endpoint";
    pub const STATUS: &str = "status";
    pub const RESULT: &str = "result";
}

pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(names::HTTP_REQUEST_DURATION_SECONDS.to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        )
        .expect("histogram buckets are non-empty")
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    counter!(
        names::HTTP_REQUESTS_TOTAL,
        labels::METHOD => method.to_string(),
        labels::ENDPOINT => endpoint.to_string(),
        labels::STATUS => status_str.clone()
    )
    .increment(1);

    histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        labels::METHOD => method.to_string(),
        labels::ENDPOINT => endpoint.to_string(),
        labels::STATUS => status_str
    )
    .record(duration_secs);
}

pub fn adjust_http_requests_in_flight(delta: f64) {
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(delta);
}

pub fn record_card_created() {
    counter!(names::CARDS_CREATED_TOTAL).increment(1);
}

pub fn record_card_view() {
    counter!(names::CARD_VIEWS_TOTAL).increment(1);
}

pub fn record_like_toggle(active: bool) {
    let result = if active { "liked" } else { "unliked" };
    counter!(names::LIKES_TOGGLED_TOTAL, labels::RESULT => result).increment(1);
}

pub fn record_save_toggle(active: bool) {
    let result = if active { "saved" } else { "unsaved" };
    counter!(names::SAVES_TOGGLED_TOTAL, labels::RESULT => result).increment(1);
}

pub fn record_rating_submitted() {
    counter!(names::RATINGS_SUBMITTED_TOTAL).increment(1);
}

pub fn record_ads_injected(count: u64) {
    counter!(names::ADS_INJECTED_TOTAL).increment(count);
}

pub fn record_payment_order(result: &'static str) {
    counter!(names::PAYMENT_ORDERS_TOTAL, labels::RESULT => result).increment(1);
}
