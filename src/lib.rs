pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::ValuationConfig;

pub use crate::adapters::exchange_rate::{
    ExchangeRateSettings, FixedRateProvider, HttpExchangeRateProvider,
};
pub use crate::adapters::storage::LocalStorage;
pub use crate::core::appraiser::Appraiser;
pub use crate::core::context::ValuationContext;
pub use crate::core::engine::{valuate, ModelParameters, ValuationEngine};
pub use crate::domain::model::{
    DistrictStats, PriceRange, PriceTable, PropertyType, RateQuote, RateSource,
    ReferenceAverages, ValuationRequest, ValuationResult,
};
pub use crate::utils::error::{Result, ValuationError};
