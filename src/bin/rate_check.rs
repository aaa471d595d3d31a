use anyhow::Result;
use tasador::domain::ports::ExchangeRateProvider;
use tasador::utils::logger;
use tasador::{HttpExchangeRateProvider, ValuationConfig};

/// Fetches the exchange rate once with the configured settings and prints the quote.
///
/// Usage: rate_check [config.toml]
#[tokio::main]
async fn main() -> Result<()> {
    logger::init_cli_logger(true);

    let config = match std::env::args().nth(1) {
        Some(path) => ValuationConfig::from_file(&path)?,
        None => ValuationConfig::default(),
    };

    let settings = config.currency.rate_settings();
    println!("🔍 Checking {} ({}/{})", settings.endpoint, settings.base, settings.symbol);

    let provider = HttpExchangeRateProvider::new(settings);
    match provider.fetch_live().await {
        Ok(rate) => println!("✅ Live rate: {}", rate),
        Err(e) => println!("❌ Live lookup failed: {}", e),
    }

    let quote = provider.get_rate().await;
    println!("{}", serde_json::to_string_pretty(&quote)?);

    Ok(())
}
