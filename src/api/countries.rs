// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{self, Country};
use crate::query::CountryFilter;
use crate::refresh::refresh_countries;
use crate::state::AppState;

#[derive(Serialize)]
pub struct RefreshResponse {
    pub message: String,
    #[serde(serialize_with = "crate::models::serialize_timestamp")]
    pub last_refreshed_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `/countries/image` is a static segment, so it always wins over `/countries/{name}`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/countries/refresh", post(refresh))
        .route("/countries/image", get(summary_image))
        .route("/countries/{name}", get(get_country).delete(delete_country))
}

async fn refresh(State(state): State<AppState>) -> AppResult<Json<RefreshResponse>> {
    let outcome = refresh_countries(
        &state.pool,
        state.source.as_ref(),
        state.renderer.clone(),
        &state.image_path,
    )
    .await?;
    info!(
        total = outcome.total_countries,
        at = %outcome.last_refreshed_at,
        "Refresh complete"
    );

    Ok(Json(RefreshResponse {
        message: "Countries refreshed successfully".to_string(),
        last_refreshed_at: outcome.last_refreshed_at,
    }))
}

async fn list_countries(
    State(state): State<AppState>,
    Query(filter): Query<CountryFilter>,
) -> AppResult<Json<Vec<Country>>> {
    let countries = models::list_countries(&state.pool).await?;
    Ok(Json(filter.apply(countries)))
}

async fn get_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Country>> {
    models::get_country(&state.pool, &name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Country not found".into()))
}

async fn delete_country(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    if !models::delete_country(&state.pool, &name).await? {
        return Err(AppError::NotFound("Country not found".into()));
    }
    info!(%name, "Country deleted");

    Ok(Json(MessageResponse {
        message: format!("{name} deleted successfully"),
    }))
}

async fn summary_image(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    match tokio::fs::read(state.image_path.as_path()).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(AppError::NotFound("Summary image not found".into()))
        }
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("Failed to read {}", state.image_path.display()))
            .into()),
    }
}
