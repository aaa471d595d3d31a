use crate::domain::model::{District, PriceTable, ReferenceAverages};

/// Derives a new table in which every district with a reference average has
/// its zone prices scaled so the district mean matches that reference.
///
/// Districts without a usable reference (missing, non-positive or non-finite),
/// without zones, or with a non-positive mean are copied unchanged. The input table is never modified.
pub fn rebase_districts(table: &PriceTable, references: &ReferenceAverages) -> PriceTable {
    let districts = table
        .districts
        .iter()
        .map(|(name, district)| {
            let rebased = match scaling_factor(district, references.get(name)) {
                Some(factor) => {
                    tracing::debug!("Rebasing {} by factor {:.4}", name, factor);
                    scale(district, factor)
                }
                None => district.clone(),
            };
            (name.clone(), rebased)
        })
        .collect();

    PriceTable { districts }
}

/// Number of districts [`rebase_districts`] actually rescales for these references.
pub fn rebased_district_count(table: &PriceTable, references: &ReferenceAverages) -> usize {
    table
        .districts
        .iter()
        .filter(|(name, district)| scaling_factor(district, references.get(name)).is_some())
        .count()
}

fn scaling_factor(district: &District, target: Option<f64>) -> Option<f64> {
    let target = target.filter(|t| t.is_finite() && *t > 0.0)?;
    let current = district.mean_price()?;
    if current > 0.0 {
        Some(target / current)
    } else {
        None
    }
}

fn scale(district: &District, factor: f64) -> District {
    District {
        zones: district
            .zones
            .iter()
            .map(|(zone, price)| (zone.clone(), (price * factor).round()))
            .collect(),
    }
}
