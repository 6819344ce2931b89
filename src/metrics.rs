use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, register_counter, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter = register_counter!(
        "engrave_requests_total",
        "Total number of generation requests"
    )
    .unwrap();
    pub static ref FALLBACK_TOTAL: Counter = register_counter!(
        "engrave_fallback_total",
        "Generations that fell back to the img2img model"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "engrave_request_latency_seconds",
        "Generation request latency in seconds"
    )
    .unwrap();
}
