use crate::domain::model::DistrictStats;

pub const BASE_TOLERANCE: f64 = 0.06;
pub const MAX_SPREAD_TOLERANCE: f64 = 0.08;
const SPREAD_WEIGHT: f64 = 0.25;

/// ± fraction applied around a point estimate. Grows with the district's
/// relative spread `(max - min) / avg`, from 6% up to 14%.
pub fn range_tolerance(stats: &DistrictStats) -> f64 {
    if stats.avg <= 0.0 {
        return BASE_TOLERANCE;
    }
    let spread = (stats.max - stats.min) / stats.avg;
    BASE_TOLERANCE + (spread * SPREAD_WEIGHT).min(MAX_SPREAD_TOLERANCE)
}
