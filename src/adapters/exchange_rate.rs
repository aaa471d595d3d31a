use crate::domain::model::RateQuote;
use crate::domain::ports::ExchangeRateProvider;
use crate::utils::error::{Result, ValuationError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_FALLBACK_RATE: f64 = 3.55;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateSettings {
    pub endpoint: String,
    /// Currency the rate is quoted against (the second currency).
    pub base: String,
    /// Currency the rate is expressed in (the primary currency).
    pub symbol: String,
    pub access_key: Option<String>,
    pub timeout: Duration,
    pub fallback_rate: f64,
}

impl Default for ExchangeRateSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.exchangerate.host/latest".to_string(),
            base: "USD".to_string(),
            symbol: "PEN".to_string(),
            access_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            fallback_rate: DEFAULT_FALLBACK_RATE,
        }
    }
}

/// Fetches `{endpoint}?base=USD&symbols=PEN` and reads `rates.PEN`.
///
/// Network errors, timeouts, non-2xx statuses, malformed bodies and
/// non-positive rates all resolve to the configured fallback rate.
pub struct HttpExchangeRateProvider {
    settings: ExchangeRateSettings,
    client: Client,
}

impl HttpExchangeRateProvider {
    pub fn new(settings: ExchangeRateSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    pub fn settings(&self) -> &ExchangeRateSettings {
        &self.settings
    }

    /// Single attempt against the live endpoint.
    pub async fn fetch_live(&self) -> Result<f64> {
        let mut request = self
            .client
            .get(&self.settings.endpoint)
            .query(&[
                ("base", self.settings.base.as_str()),
                ("symbols", self.settings.symbol.as_str()),
            ])
            .timeout(self.settings.timeout);

        if let Some(key) = &self.settings.access_key {
            request = request.query(&[("access_key", key.as_str())]);
        }

        tracing::debug!("Requesting exchange rate from: {}", self.settings.endpoint);

        let response = request.send().await?;
        tracing::debug!("Exchange rate response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ValuationError::ExternalRateUnavailable {
                message: format!("endpoint returned {}", response.status()),
            });
        }

        let body: serde_json::Value = response.json().await?;
        let rate = body
            .get("rates")
            .and_then(|rates| rates.get(&self.settings.symbol))
            .and_then(|value| value.as_f64())
            .ok_or_else(|| ValuationError::ExternalRateUnavailable {
                message: format!("rates.{} missing from response", self.settings.symbol),
            })?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(ValuationError::ExternalRateUnavailable {
                message: format!("non-positive rate {}", rate),
            });
        }

        Ok(rate)
    }
}

#[async_trait]
impl ExchangeRateProvider for HttpExchangeRateProvider {
    async fn get_rate(&self) -> RateQuote {
        match self.fetch_live().await {
            Ok(rate) => {
                tracing::info!(
                    "💱 Live rate {}/{}: {}",
                    self.settings.base,
                    self.settings.symbol,
                    rate
                );
                RateQuote::live(rate)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Failed to fetch live exchange rate ({}), using fallback {}",
                    e,
                    self.settings.fallback_rate
                );
                RateQuote::fallback(self.settings.fallback_rate)
            }
        }
    }
}

/// Always returns the same rate.
#[derive(Debug, Clone, Copy)]
pub struct FixedRateProvider {
    rate: f64,
}

impl FixedRateProvider {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

#[async_trait]
impl ExchangeRateProvider for FixedRateProvider {
    async fn get_rate(&self) -> RateQuote {
        RateQuote::fixed(self.rate)
    }
}
