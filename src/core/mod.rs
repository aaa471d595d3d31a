pub mod appraiser;
pub mod context;
pub mod engine;
pub mod factors;
pub mod rebase;
pub mod reference;
pub mod stats;
pub mod tolerance;

pub use crate::domain::model::{PriceTable, ReferenceAverages, ValuationRequest, ValuationResult};
pub use crate::domain::ports::{ExchangeRateProvider, Storage};
pub use crate::utils::error::Result;
