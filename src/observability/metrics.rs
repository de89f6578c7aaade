//! Metrics collection.
//!
//! # Metrics
//! - `frontend_route_resolutions_total` (counter): resolutions by outcome
//! - `frontend_lazy_loads_total` (counter): page module loads by route and result
//! - `frontend_search_submissions_total` (counter): dispatched searches by source
//! - `frontend_suggestion_fetch_errors_total` (counter): failed context/namespace fetches

use metrics::counter;

pub fn record_resolution(outcome: &'static str) {
    counter!("frontend_route_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_lazy_load(route: &str, result: &'static str) {
    counter!(
        "frontend_lazy_loads_total",
        "route" => route.to_string(),
        "result" => result
    )
    .increment(1);
}

pub fn record_submission(source: &'static str) {
    counter!("frontend_search_submissions_total", "source" => source).increment(1);
}

pub fn record_suggestion_fetch_error(kind: &'static str) {
    counter!("frontend_suggestion_fetch_errors_total", "kind" => kind).increment(1);
}
