// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::{format_timestamp, Country};
use crate::query::sort_by_gdp_desc;

pub const SUMMARY_FILE_NAME: &str = "summary.png";
pub const CANVAS_SIZE: (u32, u32) = (800, 600);
const TOP_N: usize = 5;
const FONT_SIZE: u32 = 28;

/// Everything drawn on the summary image.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub total_countries: usize,
    pub last_refreshed_at: DateTime<Utc>,
    /// Name and estimated GDP, highest first
    pub top: Vec<(String, f64)>,
}

impl SummaryCard {
    pub fn from_snapshot(countries: &[Country], last_refreshed_at: DateTime<Utc>) -> Self {
        let mut ranked = countries.to_vec();
        sort_by_gdp_desc(&mut ranked);

        Self {
            total_countries: countries.len(),
            last_refreshed_at,
            top: ranked
                .into_iter()
                .take(TOP_N)
                .map(|c| (c.name, c.estimated_gdp))
                .collect(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total Countries: {}", self.total_countries),
            format!("Last Refreshed: {}", format_timestamp(&self.last_refreshed_at)),
            "Top 5 Countries by GDP:".to_string(),
        ];
        for (rank, (name, gdp)) in self.top.iter().enumerate() {
            lines.push(format!("{}. {} - {}", rank + 1, name, gdp.round()));
        }
        lines
    }
}

pub trait SummaryRenderer: Send + Sync {
    /// Draw `card` into a new file at `path`.
    fn render(&self, card: &SummaryCard, path: &Path) -> Result<()>;
}

/// Black text on a white 800x600 PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngRenderer;

impl SummaryRenderer for PngRenderer {
    fn render(&self, card: &SummaryCard, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, CANVAS_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let text_style = ("sans-serif", FONT_SIZE).into_font().color(&BLACK);
        // Header rows sit 50px apart, the ranking starts one blank row lower.
        for (i, line) in card.lines().iter().enumerate() {
            let baseline = if i < 3 { 50 + 50 * i } else { 200 + 50 * (i - 3) };
            root.draw_text(line, &text_style, (50, (baseline as i32) - FONT_SIZE as i32))?;
        }

        root.present()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Render into a temporary file beside `target`, then rename over it so a
/// reader never sees a partially written image. The temporary file is removed
/// on every failure path.
pub async fn publish_summary(
    renderer: Arc<dyn SummaryRenderer>,
    card: SummaryCard,
    target: &Path,
) -> Result<()> {
    let dir = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;

    let staging = dir.join(format!(".summary-{:08x}.png", rand::random::<u32>()));
    debug!(path = %staging.display(), "Rendering summary image");

    let staging_for_render = staging.clone();
    let rendered = match tokio::task::spawn_blocking(move || {
        renderer.render(&card, &staging_for_render)
    })
    .await
    {
        Ok(result) => result,
        Err(e) => Err(anyhow::Error::new(e).context("Summary render task panicked")),
    };

    let published = match rendered {
        Ok(()) => tokio::fs::rename(&staging, target)
            .await
            .with_context(|| format!("Failed to publish {}", target.display())),
        Err(e) => Err(e),
    };

    if let Err(e) = published {
        discard_staging(&staging).await;
        return Err(e);
    }
    info!(path = %target.display(), "Summary image published");
    Ok(())
}

async fn discard_staging(staging: &Path) {
    match tokio::fs::remove_file(staging).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %staging.display(), error = %e, "Failed to remove staging image"),
    }
}
