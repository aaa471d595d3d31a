use crate::domain::model::RateQuote;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Source of the primary/second currency exchange rate.
///
/// Implementations never fail: any problem reaching the live source resolves
/// to a fallback quote.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn get_rate(&self) -> RateQuote;
}

#[async_trait]
impl ExchangeRateProvider for Box<dyn ExchangeRateProvider> {
    async fn get_rate(&self) -> RateQuote {
        (**self).get_rate().await
    }
}
