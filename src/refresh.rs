// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Context;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::sqlite::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::enrich::enrich_countries;
use crate::models::{list_countries, upsert_country};
use crate::summary_image::{publish_summary, SummaryCard, SummaryRenderer};
use crate::upstream::{UpstreamError, UpstreamSource};

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub last_refreshed_at: DateTime<Utc>,
    pub total_countries: usize,
}

/// Fetch both datasets, upsert every country under one timestamp, then
/// re-read the table and publish the summary image.
///
/// Nothing is written unless both fetches succeed. The upserts share one
/// transaction, so a failure part-way leaves the previous snapshot intact.
#[instrument(skip_all)]
pub async fn refresh_countries(
    pool: &SqlitePool,
    source: &dyn UpstreamSource,
    renderer: Arc<dyn SummaryRenderer>,
    image_path: &Path,
) -> Result<RefreshOutcome, RefreshError> {
    let data = source.fetch().await?;
    info!(
        countries = data.countries.len(),
        rates = data.rates.len(),
        "Upstream data fetched"
    );

    let refreshed_at = Utc::now().trunc_subsecs(3);
    let rows = {
        let mut rng = rand::rng();
        enrich_countries(&data.countries, &data.rates, refreshed_at, &mut rng)
    };

    let mut tx = pool.begin().await.context("Failed to start transaction")?;
    for row in &rows {
        upsert_country(&mut *tx, row)
            .await
            .with_context(|| format!("Failed to upsert {}", row.name))?;
    }
    tx.commit().await.context("Failed to commit refresh")?;
    info!(upserted = rows.len(), "Countries stored");

    let snapshot = list_countries(pool).await?;
    let card = SummaryCard::from_snapshot(&snapshot, refreshed_at);
    publish_summary(renderer, card, image_path).await?;

    Ok(RefreshOutcome {
        last_refreshed_at: refreshed_at,
        total_countries: snapshot.len(),
    })
}
