//! Prometheus metrics for the echo session service.
//!
//! Covers session lifecycle (opened, closed, active, duration) and
//! per-frame counters split by frame type.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "echo";

lazy_static! {
    /// Number of live WebSocket sessions
    pub static ref SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        format!("{}_sessions_active", METRIC_PREFIX),
        "Number of live WebSocket sessions"
    ).unwrap();

    /// Total WebSocket sessions opened
    pub static ref SESSIONS_OPENED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_sessions_opened_total", METRIC_PREFIX),
        "Total WebSocket sessions opened"
    ).unwrap();

    /// Total WebSocket sessions closed
    pub static ref SESSIONS_CLOSED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_sessions_closed_total", METRIC_PREFIX),
        "Total WebSocket sessions closed"
    ).unwrap();

    /// Session duration from upgrade to teardown
    pub static ref SESSION_DURATION_SECONDS: Histogram = register_histogram!(
        format!("{}_session_duration_seconds", METRIC_PREFIX),
        "WebSocket session duration in seconds",
        vec![1.0, 5.0, 10.0, 30.0, 60.0, 300.0, 600.0, 1800.0, 3600.0]
    ).unwrap();

    /// Frames received from peers, by frame type
    pub static ref FRAMES_RECEIVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_frames_received_total", METRIC_PREFIX),
        "Total WebSocket frames received from peers",
        &["type"]
    ).unwrap();

    /// Text frames echoed back to peers
    pub static ref FRAMES_ECHOED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_frames_echoed_total", METRIC_PREFIX),
        "Total text frames echoed back to peers"
    ).unwrap();
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording per-frame metrics
pub struct FrameMetrics;

impl FrameMetrics {
    pub fn record_text() {
        FRAMES_RECEIVED_TOTAL.with_label_values(&["text"]).inc();
    }

    pub fn record_binary() {
        FRAMES_RECEIVED_TOTAL.with_label_values(&["binary"]).inc();
    }

    pub fn record_control() {
        FRAMES_RECEIVED_TOTAL.with_label_values(&["control"]).inc();
    }

    pub fn record_close() {
        FRAMES_RECEIVED_TOTAL.with_label_values(&["close"]).inc();
    }

    pub fn record_echoed() {
        FRAMES_ECHOED_TOTAL.inc();
    }
}

/// Helper struct for recording session lifecycle metrics
pub struct SessionMetrics;

impl SessionMetrics {
    pub fn record_opened() {
        SESSIONS_OPENED_TOTAL.inc();
    }

    pub fn record_closed(duration_secs: f64) {
        SESSIONS_CLOSED_TOTAL.inc();
        SESSION_DURATION_SECONDS.observe(duration_secs);
    }
}
