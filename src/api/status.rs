// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::list_countries;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub total_countries: usize,
    #[serde(serialize_with = "crate::models::serialize_optional_timestamp")]
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/status", get(status))
}

/// The timestamp comes from the first row the scan returns, not the newest one.
async fn status(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    let countries = list_countries(&state.pool).await?;

    Ok(Json(StatusResponse {
        total_countries: countries.len(),
        last_refreshed_at: countries.first().map(|c| c.last_refreshed_at),
    }))
}
