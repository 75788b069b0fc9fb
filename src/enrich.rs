// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::{DateTime, Utc};
use rand::Rng;
use std::ops::RangeInclusive;
use tracing::warn;

use crate::models::NewCountry;
use crate::upstream::{RateMap, RestCountry};

/// Bounds of the per-country multiplier in the GDP estimate. Redrawn on every
/// refresh, so estimates are not reproducible between refreshes.
pub const GDP_MULTIPLIER_RANGE: RangeInclusive<u32> = 1000..=2000;

/// First currency code listed for the country, if any
pub fn primary_currency(country: &RestCountry) -> Option<String> {
    country
        .currencies
        .as_ref()
        .and_then(|currencies| currencies.first())
        .and_then(|currency| non_empty(currency.code.as_ref()))
}

/// Units of `code` per USD. Zero or negative rates count as missing.
pub fn lookup_rate(code: Option<&str>, rates: &RateMap) -> Option<f64> {
    code.and_then(|code| rates.get(code))
        .copied()
        .filter(|rate| *rate > 0.0)
}

pub fn estimate_gdp(population: i64, rate: Option<f64>, multiplier: u32) -> f64 {
    match rate {
        Some(rate) => population as f64 * f64::from(multiplier) / rate,
        None => 0.0,
    }
}

/// Join every country with its exchange rate and compute the derived columns.
/// All rows share `refreshed_at`.
pub fn enrich_countries<R: Rng>(
    countries: &[RestCountry],
    rates: &RateMap,
    refreshed_at: DateTime<Utc>,
    rng: &mut R,
) -> Vec<NewCountry> {
    countries
        .iter()
        .map(|country| {
            let currency_code = primary_currency(country);
            let exchange_rate = lookup_rate(currency_code.as_deref(), rates);
            let population = stored_population(&country.name, country.population);
            let multiplier = rng.random_range(GDP_MULTIPLIER_RANGE);

            NewCountry {
                name: country.name.clone(),
                capital: non_empty(country.capital.as_ref()),
                region: non_empty(country.region.as_ref()),
                population,
                currency_code,
                exchange_rate,
                estimated_gdp: estimate_gdp(population, exchange_rate, multiplier),
                flag_url: non_empty(country.flag.as_ref()),
                last_refreshed_at: refreshed_at,
            }
        })
        .collect()
}

/// SQLite integers are signed; anything past `i64::MAX` is stored as the max.
fn stored_population(name: &str, population: u64) -> i64 {
    i64::try_from(population).unwrap_or_else(|_| {
        warn!(country = name, population, "Population exceeds i64::MAX, clamping");
        i64::MAX
    })
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}
