// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

pub mod countries;
pub mod status;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(countries::routes())
        .merge(status::routes())
        .layer(TraceLayer::new_for_http())
        // Any origin may call the API.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
