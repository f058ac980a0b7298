use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::core::currency::{CurrencyCatalog, RateSnapshot};

/// Client for the Frankfurter exchange rate API.
#[derive(Clone)]
pub struct FrankfurterClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: Option<String>,
    rates: Map<String, Value>,
}

impl FrankfurterClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent("xfx/1.0").build()?;
        Ok(FrankfurterClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_text(&self, url: &str, what: &str) -> Result<String> {
        debug!("Requesting {} from {}", what, url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for {} URL: {}", e, what, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for {}", response.status(), what));
        }

        Ok(response.text().await?)
    }

    /// Lists supported currencies in the order the API returns them.
    #[instrument(name = "FrankfurterCurrencies", skip(self))]
    pub async fn fetch_currencies(&self) -> Result<CurrencyCatalog> {
        let url = format!("{}/currencies", self.base_url);
        let text = self.get_text(&url, "currencies").await?;

        let data: Map<String, Value> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for currencies: {}", e))?;

        let entries = data
            .into_iter()
            .filter_map(|(code, name)| match name {
                Value::String(name) => Some((code, name)),
                other => {
                    debug!(%code, ?other, "Skipping currency without a display name");
                    None
                }
            })
            .collect();
        Ok(CurrencyCatalog::new(entries))
    }

    /// Latest rates for `base`, optionally restricted to `symbols`.
    #[instrument(name = "FrankfurterLatest", skip(self))]
    pub async fn fetch_latest(&self, base: &str, symbols: Option<&str>) -> Result<RateSnapshot> {
        let mut params = vec![("base", base)];
        if let Some(symbols) = symbols {
            params.push(("symbols", symbols));
        }
        let url = reqwest::Url::parse_with_params(&format!("{}/latest", self.base_url), &params)
            .map_err(|e| anyhow!("Invalid rates URL for {}: {}", base, e))?;
        let what = format!("rates of {base}");
        let text = self.get_text(url.as_str(), &what).await?;

        let data: LatestResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", what, e))?;

        let rates = data
            .rates
            .into_iter()
            .filter_map(|(code, rate)| rate.as_f64().map(|rate| (code, rate)))
            .collect();
        Ok(RateSnapshot::new(&data.base, data.date, rates))
    }

    /// Rate for a single pair. Missing or non-positive rates are errors.
    pub async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64> {
        let snapshot = self.fetch_latest(from, Some(to)).await?;
        snapshot
            .get(to)
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or_else(|| anyhow!("Rate not found for {}/{}", from, to))
    }
}
