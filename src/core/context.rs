use crate::core::engine::{ModelParameters, ValuationEngine};
use crate::core::rebase::{rebase_districts, rebased_district_count};
use crate::core::stats::compute_district_stats;
use crate::domain::model::{
    DistrictStatsMap, PriceTable, ReferenceAverages, ValuationRequest, ValuationResult,
};
use crate::utils::error::Result;

/// Read-only state shared by every valuation: the rebased table, its
/// per-district stats and the model parameters.
///
/// Built once at startup; wrap it in an `Arc` to share it across tasks.
#[derive(Debug, Clone)]
pub struct ValuationContext {
    table: PriceTable,
    stats: DistrictStatsMap,
    engine: ValuationEngine,
    rebased: usize,
}

impl ValuationContext {
    pub fn build(
        raw_table: &PriceTable,
        references: &ReferenceAverages,
        params: ModelParameters,
    ) -> Self {
        let table = rebase_districts(raw_table, references);
        let stats = compute_district_stats(&table);

        let rebased = rebased_district_count(raw_table, references);
        tracing::info!(
            "✅ Valuation context ready: {} districts ({} rebased), {} with stats",
            table.len(),
            rebased,
            stats.len()
        );

        Self {
            table,
            stats,
            engine: ValuationEngine::new(params),
            rebased,
        }
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn stats(&self) -> &DistrictStatsMap {
        &self.stats
    }

    /// Districts whose prices were rescaled to a reference average.
    pub fn rebased_count(&self) -> usize {
        self.rebased
    }

    pub fn params(&self) -> &ModelParameters {
        self.engine.params()
    }

    pub fn valuate(&self, request: &ValuationRequest) -> Result<ValuationResult> {
        self.engine.valuate(&self.table, &self.stats, request)
    }
}
