// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Request handlers for the stats API

use std::sync::Arc;
use axum::{extract::State, response::Html, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Engine, Stats};

static INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Envelope for every API response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: &str) -> Self {
        Self {
            data,
            message: message.to_string(),
        }
    }
}

/// Serializes as `{}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Empty {}

/// GET /api/v1/stats
pub async fn stats_handler(State(engine): State<Arc<Engine>>) -> Json<ApiResponse<Stats>> {
    let stats = engine.snapshot();
    debug!(revolutions = stats.total_revolutions, "stats requested");
    Json(ApiResponse::new(stats, "ok"))
}

/// POST /api/v1/reset
pub async fn reset_handler(State(engine): State<Arc<Engine>>) -> Json<ApiResponse<Empty>> {
    engine.reset();
    Json(ApiResponse::new(Empty {}, "reset done"))
}

/// GET /
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
