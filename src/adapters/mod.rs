// Adapters layer: concrete implementations for external systems (files, exchange rate API).

pub mod exchange_rate;
pub mod price_data;
pub mod storage;
