use crate::core::context::ValuationContext;
use crate::domain::model::{PriceRange, SecondCurrencyRange, ValuationRequest, ValuationResult};
use crate::domain::ports::ExchangeRateProvider;
use crate::utils::error::Result;
use std::sync::Arc;

/// Valuates requests and, when asked, converts the range into the second
/// currency using an injected rate provider.
pub struct Appraiser<P: ExchangeRateProvider> {
    context: Arc<ValuationContext>,
    rates: P,
    second_currency: String,
}

impl<P: ExchangeRateProvider> Appraiser<P> {
    pub fn new(context: Arc<ValuationContext>, rates: P, second_currency: impl Into<String>) -> Self {
        Self {
            context,
            rates,
            second_currency: second_currency.into(),
        }
    }

    pub fn context(&self) -> &ValuationContext {
        &self.context
    }

    pub async fn appraise(&self, request: &ValuationRequest) -> Result<ValuationResult> {
        let mut result = self.context.valuate(request)?;

        if request.include_second_currency {
            let quote = self.rates.get_rate().await;
            if quote.is_fallback() {
                tracing::info!(
                    "Converting to {} with fallback rate {}",
                    self.second_currency,
                    quote.rate
                );
            }

            result.second_currency = Some(SecondCurrencyRange {
                currency: self.second_currency.clone(),
                rate: quote.rate,
                rate_source: quote.source,
                fetched_at: quote.fetched_at,
                range: convert_range(&result.range, quote.rate),
            });
        }

        Ok(result)
    }
}

/// Divides both bounds by `rate` (primary units per second-currency unit).
pub fn convert_range(range: &PriceRange, rate: f64) -> PriceRange {
    PriceRange {
        min: (range.min / rate).round(),
        max: (range.max / rate).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::exchange_rate::FixedRateProvider;
    use crate::core::engine::ModelParameters;
    use crate::domain::model::{PriceTable, PropertyType, RateSource, ReferenceAverages};

    fn context() -> Arc<ValuationContext> {
        let mut table = PriceTable::new();
        table.insert_zone("Surquillo", "Centro", 6700.0);
        Arc::new(ValuationContext::build(
            &table,
            &ReferenceAverages::default(),
            ModelParameters::default(),
        ))
    }

    #[test]
    fn test_convert_range() {
        let range = PriceRange {
            min: 355_000.0,
            max: 710_000.0,
        };
        assert_eq!(
            convert_range(&range, 3.55),
            PriceRange {
                min: 100_000.0,
                max: 200_000.0
            }
        );
    }

    #[tokio::test]
    async fn test_appraise_without_second_currency() {
        let appraiser = Appraiser::new(context(), FixedRateProvider::new(3.55), "USD");
        let request = ValuationRequest::new("Surquillo", PropertyType::Apartment).covered_area(70.0);

        let result = appraiser.appraise(&request).await.unwrap();

        assert!(result.second_currency.is_none());
    }

    #[tokio::test]
    async fn test_appraise_with_second_currency() {
        let appraiser = Appraiser::new(context(), FixedRateProvider::new(3.5), "USD");
        let request = ValuationRequest::new("Surquillo", PropertyType::Apartment)
            .covered_area(70.0)
            .with_second_currency();

        let result = appraiser.appraise(&request).await.unwrap();
        let usd = result.second_currency.expect("second currency block");

        assert_eq!(usd.currency, "USD");
        assert_eq!(usd.rate, 3.5);
        assert_eq!(usd.rate_source, RateSource::Fixed);
        assert_eq!(usd.range.min, (result.range.min / 3.5).round());
        assert_eq!(usd.range.max, (result.range.max / 3.5).round());
    }

    #[tokio::test]
    async fn test_invalid_request_skips_rate_lookup() {
        let appraiser = Appraiser::new(context(), FixedRateProvider::new(3.5), "USD");
        let request = ValuationRequest::new("Atlantis", PropertyType::Apartment)
            .covered_area(70.0)
            .with_second_currency();

        assert!(appraiser.appraise(&request).await.is_err());
    }
}
