// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Currency code -> units of that currency per USD
pub type RateMap = HashMap<String, f64>;

#[derive(Debug, Clone, Deserialize)]
pub struct RestCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: u64,
    pub flag: Option<String>,
    pub currencies: Option<Vec<RestCurrency>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestCurrency {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExchangeRatesResponse {
    rates: RateMap,
}

/// Both datasets a refresh needs.
#[derive(Debug, Clone)]
pub struct UpstreamData {
    pub countries: Vec<RestCountry>,
    pub rates: RateMap,
}

#[derive(Debug, thiserror::Error)]
#[error("Could not fetch data from {source_name}: {reason}")]
pub struct UpstreamError {
    pub source_name: &'static str,
    pub reason: String,
}

impl UpstreamError {
    fn new(source_name: &'static str, reason: impl ToString) -> Self {
        Self {
            source_name,
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
pub trait UpstreamSource: Send + Sync {
    /// Fetch the country list and the rate map. Fails as a whole if either does.
    async fn fetch(&self) -> Result<UpstreamData, UpstreamError>;
}

#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    countries_url: String,
    exchange_url: String,
}

impl UpstreamClient {
    pub fn new(countries_url: impl Into<String>, exchange_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            countries_url: countries_url.into(),
            exchange_url: exchange_url.into(),
        }
    }

    pub async fn get_countries(&self) -> Result<Vec<RestCountry>, UpstreamError> {
        self.get_json("countries API", &self.countries_url).await
    }

    pub async fn get_exchange_rates(&self) -> Result<RateMap, UpstreamError> {
        let response: ExchangeRatesResponse =
            self.get_json("exchange rate API", &self.exchange_url).await?;
        Ok(response.rates)
    }

    #[instrument(skip(self))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        source_name: &'static str,
        url: &str,
    ) -> Result<T, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::new(source_name, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Upstream request failed");
            return Err(UpstreamError::new(
                source_name,
                format!("API request failed with status: {status}"),
            ));
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::new(source_name, format!("invalid payload: {e}")))?;
        debug!("Upstream payload decoded");
        Ok(body)
    }
}

#[async_trait]
impl UpstreamSource for UpstreamClient {
    async fn fetch(&self) -> Result<UpstreamData, UpstreamError> {
        let (countries, rates) =
            futures::future::try_join(self.get_countries(), self.get_exchange_rates()).await?;
        Ok(UpstreamData { countries, rates })
    }
}
