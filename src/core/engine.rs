use crate::core::factors::{
    age_depreciation, bedroom_adjustment, floor_elevator_adjustment, type_factor,
};
use crate::core::tolerance::range_tolerance;
use crate::domain::model::{
    DistrictStats, DistrictStatsMap, FactorBreakdown, PriceRange, PriceTable, ValuationRequest,
    ValuationResult,
};
use crate::utils::error::{Result, ValuationError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_ADJUSTED_UNIT_PRICE: f64 = 800.0;

/// Tunable constants of the valuation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Lower clamp for the adjusted price per m², in primary currency units.
    #[serde(default = "default_min_adjusted_unit_price")]
    pub min_adjusted_unit_price: f64,
}

fn default_min_adjusted_unit_price() -> f64 {
    DEFAULT_MIN_ADJUSTED_UNIT_PRICE
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            min_adjusted_unit_price: DEFAULT_MIN_ADJUSTED_UNIT_PRICE,
        }
    }
}

impl Validate for ValuationRequest {
    fn validate(&self) -> Result<()> {
        if self.district.trim().is_empty() {
            return Err(ValuationError::invalid_request("district is required"));
        }

        let property_type = self
            .property_type
            .as_ref()
            .ok_or_else(|| ValuationError::invalid_request("property_type is required"))?;

        if !(self.age_years.is_finite() && self.age_years >= 0.0) {
            return Err(ValuationError::invalid_request(format!(
                "age_years must be a non-negative number, got {}",
                self.age_years
            )));
        }

        if !property_type.is_land() {
            match self.covered_area_m2 {
                Some(area) if area.is_finite() && area > 0.0 => {}
                Some(area) => {
                    return Err(ValuationError::invalid_request(format!(
                        "covered_area_m2 must be positive, got {}",
                        area
                    )))
                }
                None => {
                    return Err(ValuationError::invalid_request(format!(
                        "covered_area_m2 is required for property type {}",
                        property_type
                    )))
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    params: ModelParameters,
}

impl ValuationEngine {
    pub fn new(params: ModelParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Prices one request against an already rebased table and its stats.
    pub fn valuate(
        &self,
        table: &PriceTable,
        stats: &DistrictStatsMap,
        request: &ValuationRequest,
    ) -> Result<ValuationResult> {
        request.validate()?;
        let property_type = request
            .property_type
            .clone()
            .ok_or_else(|| ValuationError::invalid_request("property_type is required"))?;

        let (base_unit_price, zone) = resolve_base_price(table, request)?;
        let applied_area_m2 = applicable_area(request);

        let factors = FactorBreakdown {
            type_factor: type_factor(&property_type),
            age_factor: 1.0 + age_depreciation(request.age_years),
            floor_factor: 1.0
                + floor_elevator_adjustment(request.floor_number, request.has_elevator),
            bedroom_factor: 1.0 + bedroom_adjustment(request.bedrooms),
        };

        let adjusted_unit_price = (base_unit_price
            * factors.type_factor
            * factors.age_factor
            * factors.floor_factor
            * factors.bedroom_factor)
            .round()
            .max(self.params.min_adjusted_unit_price);
        let subtotal = adjusted_unit_price * applied_area_m2;

        let district_stats = match stats.get(&request.district) {
            Some(found) => *found,
            None => {
                tracing::debug!(
                    "No stats for district {}, using base price {}",
                    request.district,
                    base_unit_price
                );
                DistrictStats::degenerate(base_unit_price)
            }
        };

        let tolerance = range_tolerance(&district_stats);
        let range = PriceRange {
            min: (subtotal * (1.0 - tolerance)).round(),
            max: (subtotal * (1.0 + tolerance)).round(),
        };

        tracing::debug!(
            "Valuated {} ({}): {} -> {} per m2 over {} m2, ±{:.1}%",
            request.district,
            property_type,
            base_unit_price,
            adjusted_unit_price,
            applied_area_m2,
            tolerance * 100.0
        );

        Ok(ValuationResult {
            district: request.district.clone(),
            zone,
            property_type,
            base_unit_price,
            adjusted_unit_price,
            applied_area_m2,
            subtotal,
            range,
            tolerance_used_pct: (tolerance * 1000.0).round() / 10.0,
            factors,
            district_stats,
            second_currency: None,
        })
    }
}

/// [`ValuationEngine::valuate`] with the default model parameters.
pub fn valuate(
    table: &PriceTable,
    stats: &DistrictStatsMap,
    request: &ValuationRequest,
) -> Result<ValuationResult> {
    ValuationEngine::default().valuate(table, stats, request)
}

/// Zone price when the zone is known, otherwise the rounded district mean.
fn resolve_base_price(
    table: &PriceTable,
    request: &ValuationRequest,
) -> Result<(f64, Option<String>)> {
    let district = table.district(&request.district).ok_or_else(|| {
        ValuationError::invalid_request(format!("District not found: {}", request.district))
    })?;

    if let Some(zone) = &request.zone {
        match district.zones.get(zone) {
            Some(price) => return Ok((*price, Some(zone.clone()))),
            None => tracing::debug!(
                "Zone {} not found in {}, using district average",
                zone,
                request.district
            ),
        }
    }

    let mean = district.mean_price().ok_or_else(|| {
        ValuationError::invalid_request(format!(
            "District has no zone prices: {}",
            request.district
        ))
    })?;
    Ok((mean.round(), None))
}

fn applicable_area(request: &ValuationRequest) -> f64 {
    let positive = |area: Option<f64>| area.filter(|a| a.is_finite() && *a > 0.0);

    let is_land = request
        .property_type
        .as_ref()
        .map(|t| t.is_land())
        .unwrap_or(false);

    if is_land {
        positive(request.land_area_m2)
            .or(positive(request.covered_area_m2))
            .unwrap_or(0.0)
    } else {
        request.covered_area_m2.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::compute_district_stats;
    use crate::domain::model::{District, PropertyType};

    fn sample_table() -> PriceTable {
        let mut table = PriceTable::new();
        table.insert_zone("Miraflores", "San Antonio", 9000.0);
        table.insert_zone("Miraflores", "Malecon", 10500.0);
        table.insert_zone("Miraflores", "Santa Cruz", 7500.0);
        table.insert_zone("Lince", "Centro", 7000.0);
        table.insert_zone("Lince", "Risso", 7400.0);
        table
    }

    #[test]
    fn test_valuate_with_district_average() {
        let table = sample_table();
        let stats = compute_district_stats(&table);
        let request = ValuationRequest::new("Miraflores", PropertyType::Apartment)
            .covered_area(80.0)
            .age(12.0)
            .floor(6, true)
            .bedrooms(3);

        let result = valuate(&table, &stats, &request).unwrap();

        assert_eq!(result.zone, None);
        assert_eq!(result.base_unit_price, 9000.0);
        assert_eq!(result.factors.type_factor, 1.0);
        assert!((result.factors.age_factor - 0.948).abs() < 1e-9);
        assert!((result.factors.floor_factor - 1.015).abs() < 1e-9);
        assert_eq!(result.factors.bedroom_factor, 1.0);
        // 9000 * 0.948 * 1.015 = 8659.98
        assert_eq!(result.adjusted_unit_price, 8660.0);
        assert_eq!(result.subtotal, 8660.0 * 80.0);
        // spread 3000 / 9000 hits the 14% cap
        assert_eq!(result.tolerance_used_pct, 14.0);
        assert!(result.range.min <= result.subtotal && result.subtotal <= result.range.max);
    }

    #[test]
    fn test_valuate_with_known_zone() {
        let table = sample_table();
        let stats = compute_district_stats(&table);
        let request = ValuationRequest::new("Lince", PropertyType::House)
            .zone("Risso")
            .covered_area(100.0);

        let result = valuate(&table, &stats, &request).unwrap();

        assert_eq!(result.zone.as_deref(), Some("Risso"));
        assert_eq!(result.base_unit_price, 7400.0);
        assert_eq!(result.adjusted_unit_price, (7400.0_f64 * 0.95).round());
    }

    #[test]
    fn test_unknown_zone_falls_back_to_average() {
        let table = sample_table();
        let stats = compute_district_stats(&table);
        let request = ValuationRequest::new("Lince", PropertyType::Apartment)
            .zone("Nowhere")
            .covered_area(50.0);

        let result = valuate(&table, &stats, &request).unwrap();

        assert_eq!(result.zone, None);
        assert_eq!(result.base_unit_price, 7200.0);
    }

    #[test]
    fn test_land_uses_land_area() {
        let table = sample_table();
        let stats = compute_district_stats(&table);
        let request = ValuationRequest::new("Lince", PropertyType::Land).land_area(200.0);

        let result = valuate(&table, &stats, &request).unwrap();

        assert_eq!(result.applied_area_m2, 200.0);
        assert_eq!(result.factors.type_factor, 0.90);
    }

    #[test]
    fn test_land_without_any_area_prices_zero() {
        let table = sample_table();
        let stats = compute_district_stats(&table);
        let request = ValuationRequest::new("Lince", PropertyType::Land);

        let result = valuate(&table, &stats, &request).unwrap();

        assert_eq!(result.applied_area_m2, 0.0);
        assert_eq!(result.subtotal, 0.0);
        assert_eq!(result.range, PriceRange { min: 0.0, max: 0.0 });
    }

    #[test]
    fn test_unknown_district_is_invalid() {
        let table = sample_table();
        let stats = compute_district_stats(&table);
        let request = ValuationRequest::new("Atlantis", PropertyType::Apartment).covered_area(80.0);

        let err = valuate(&table, &stats, &request).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidRequest { .. }));
    }

    #[test]
    fn test_district_without_zones_is_invalid() {
        let mut table = sample_table();
        table.districts.insert("Ancon".to_string(), District::default());
        let stats = compute_district_stats(&table);

        let request = ValuationRequest::new("Ancon", PropertyType::Apartment).covered_area(80.0);
        assert!(matches!(
            valuate(&table, &stats, &request),
            Err(ValuationError::InvalidRequest { .. })
        ));

        // a zone name does not rescue an empty district
        let zoned = request.zone("Balneario");
        assert!(matches!(
            valuate(&table, &stats, &zoned),
            Err(ValuationError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_infinite_land_area_is_treated_as_absent() {
        let table = sample_table();
        let stats = compute_district_stats(&table);

        let fallback = ValuationRequest::new("Lince", PropertyType::Land)
            .land_area(f64::INFINITY)
            .covered_area(150.0);
        let result = valuate(&table, &stats, &fallback).unwrap();
        assert_eq!(result.applied_area_m2, 150.0);
        assert!(result.subtotal.is_finite());

        let nothing = ValuationRequest::new("Lince", PropertyType::Land).land_area(f64::INFINITY);
        let result = valuate(&table, &stats, &nothing).unwrap();
        assert_eq!(result.applied_area_m2, 0.0);
        assert_eq!(result.range, PriceRange { min: 0.0, max: 0.0 });
    }

    #[test]
    fn test_fractional_age_is_priced_pro_rata() {
        let table = sample_table();
        let stats = compute_district_stats(&table);
        let request: ValuationRequest = serde_json::from_str(
            r#"{ "district": "Lince", "property_type": "Departamento",
                 "covered_area_m2": 60, "age_years": 2.5 }"#,
        )
        .unwrap();

        let result = valuate(&table, &stats, &request).unwrap();

        assert!((result.factors.age_factor - 0.995).abs() < 1e-9);
        assert_eq!(result.adjusted_unit_price, (7200.0_f64 * 0.995).round());
    }

    #[test]
    fn test_negative_or_nan_age_is_invalid() {
        let table = sample_table();
        let stats = compute_district_stats(&table);

        for age in [-1.0, f64::NAN, f64::INFINITY] {
            let request = ValuationRequest::new("Lince", PropertyType::Apartment)
                .covered_area(60.0)
                .age(age);
            assert!(matches!(
                valuate(&table, &stats, &request),
                Err(ValuationError::InvalidRequest { .. })
            ));
        }
    }

    #[test]
    fn test_missing_covered_area_is_invalid() {
        let table = sample_table();
        let stats = compute_district_stats(&table);

        let missing = ValuationRequest::new("Lince", PropertyType::Apartment);
        assert!(matches!(
            valuate(&table, &stats, &missing),
            Err(ValuationError::InvalidRequest { .. })
        ));

        let negative = ValuationRequest::new("Lince", PropertyType::House).covered_area(-10.0);
        assert!(matches!(
            valuate(&table, &stats, &negative),
            Err(ValuationError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_missing_property_type_is_invalid() {
        let table = sample_table();
        let stats = compute_district_stats(&table);
        let mut request = ValuationRequest::new("Lince", PropertyType::Apartment).covered_area(80.0);
        request.property_type = None;

        assert!(matches!(
            valuate(&table, &stats, &request),
            Err(ValuationError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_adjusted_price_is_clamped() {
        let mut table = PriceTable::new();
        table.insert_zone("Ventanilla", "Centro", 900.0);
        let stats = compute_district_stats(&table);
        let request = ValuationRequest::new("Ventanilla", PropertyType::Land)
            .land_area(100.0)
            .age(80.0)
            .floor(30, false)
            .bedrooms(0);

        let result = valuate(&table, &stats, &request).unwrap();

        assert_eq!(result.adjusted_unit_price, DEFAULT_MIN_ADJUSTED_UNIT_PRICE);
    }

    #[test]
    fn test_clamp_is_configurable() {
        let mut table = PriceTable::new();
        table.insert_zone("Ventanilla", "Centro", 900.0);
        let stats = compute_district_stats(&table);
        let request = ValuationRequest::new("Ventanilla", PropertyType::Apartment)
            .covered_area(50.0)
            .age(60.0);

        let engine = ValuationEngine::new(ModelParameters {
            min_adjusted_unit_price: 1200.0,
        });
        let result = engine.valuate(&table, &stats, &request).unwrap();

        assert_eq!(result.adjusted_unit_price, 1200.0);
    }

    #[test]
    fn test_missing_stats_use_base_price() {
        let table = sample_table();
        let request = ValuationRequest::new("Lince", PropertyType::Apartment).covered_area(60.0);

        let result = valuate(&table, &DistrictStatsMap::new(), &request).unwrap();

        assert_eq!(result.district_stats, DistrictStats::degenerate(7200.0));
        assert_eq!(result.tolerance_used_pct, 6.0);
    }

    #[test]
    fn test_range_widens_with_spread() {
        let request = ValuationRequest::new("Test", PropertyType::Apartment).covered_area(100.0);
        let mut previous_width = 0.0;

        for half_width in [0.0, 200.0, 500.0, 1000.0, 1500.0] {
            let mut table = PriceTable::new();
            table.insert_zone("Test", "A", 5000.0 - half_width);
            table.insert_zone("Test", "B", 5000.0 + half_width);
            let stats = compute_district_stats(&table);

            let result = valuate(&table, &stats, &request).unwrap();
            let width = result.range.max - result.range.min;
            assert!(width >= previous_width);
            previous_width = width;
        }
    }
}
