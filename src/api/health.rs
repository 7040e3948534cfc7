//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::metrics::{FRAMES_ECHOED_TOTAL, FRAMES_RECEIVED_TOTAL};
use crate::server::AppState;
use crate::session::SessionStats;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub sessions: SessionHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct SessionHealthResponse {
    pub active: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub sessions: SessionStats,
    pub frames: FrameStats,
}

#[derive(Debug, Serialize)]
pub struct FrameStats {
    pub text_received: u64,
    pub echoed: u64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = state.start_time.elapsed().as_secs();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        sessions: SessionHealthResponse {
            active: state.registry.len(),
        },
    })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        sessions: state.registry.stats(),
        frames: FrameStats {
            text_received: FRAMES_RECEIVED_TOTAL.with_label_values(&["text"]).get(),
            echoed: FRAMES_ECHOED_TOTAL.get(),
        },
    })
}
