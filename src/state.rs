// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::summary_image::{PngRenderer, SummaryRenderer};
use crate::upstream::{UpstreamClient, UpstreamSource};

/// Shared state handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub source: Arc<dyn UpstreamSource>,
    pub renderer: Arc<dyn SummaryRenderer>,
    pub image_path: Arc<PathBuf>,
}

impl AppState {
    pub fn from_config(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            source: Arc::new(UpstreamClient::new(
                config.countries_api_url.clone(),
                config.exchange_api_url.clone(),
            )),
            renderer: Arc::new(PngRenderer),
            image_path: Arc::new(config.summary_image_path()),
        }
    }
}
