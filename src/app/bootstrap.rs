use crate::adapters::exchange_rate::{FixedRateProvider, HttpExchangeRateProvider};
use crate::adapters::price_data::{load_price_table, load_reference_averages};
use crate::adapters::storage::LocalStorage;
use crate::config::toml_config::ValuationConfig;
use crate::core::appraiser::Appraiser;
use crate::core::context::ValuationContext;
use crate::core::reference::lima_reference_averages;
use crate::domain::ports::ExchangeRateProvider;
use crate::utils::error::{Result, ValuationError};
use std::sync::Arc;

/// Loads the configured data files and builds the shared valuation context.
pub async fn build_context(config: &ValuationConfig) -> Result<ValuationContext> {
    let storage = LocalStorage::new(config.data.base_dir.clone());

    let price_table_path =
        config
            .price_table_path()
            .ok_or_else(|| ValuationError::MissingConfigError {
                field: "data.price_table".to_string(),
            })?;
    let raw_table = load_price_table(&storage, price_table_path).await?;

    let references = match &config.data.reference_averages {
        Some(path) => load_reference_averages(&storage, path).await?,
        None => {
            tracing::info!("Using built-in Lima district averages (2025-04)");
            lima_reference_averages()
        }
    };

    Ok(ValuationContext::build(
        &raw_table,
        &references,
        config.model.clone(),
    ))
}

pub fn rate_provider(config: &ValuationConfig) -> Box<dyn ExchangeRateProvider> {
    if config.currency.offline {
        tracing::info!(
            "Offline mode, using fixed rate {}",
            config.currency.fallback_rate()
        );
        Box::new(FixedRateProvider::new(config.currency.fallback_rate()))
    } else {
        Box::new(HttpExchangeRateProvider::new(config.currency.rate_settings()))
    }
}

pub async fn build_appraiser(
    config: &ValuationConfig,
) -> Result<Appraiser<Box<dyn ExchangeRateProvider>>> {
    let context = Arc::new(build_context(config).await?);
    Ok(Appraiser::new(
        context,
        rate_provider(config),
        config.currency.secondary.clone(),
    ))
}
