use crate::domain::model::{DistrictStats, DistrictStatsMap, PriceTable};

/// min, max and rounded mean of every district that has at least one zone.
pub fn compute_district_stats(table: &PriceTable) -> DistrictStatsMap {
    table
        .districts
        .iter()
        .filter_map(|(name, district)| {
            let mean = district.mean_price()?;
            let min = district.zones.values().copied().fold(f64::INFINITY, f64::min);
            let max = district
                .zones
                .values()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);

            Some((
                name.clone(),
                DistrictStats {
                    min,
                    max,
                    avg: mean.round(),
                },
            ))
        })
        .collect()
}
