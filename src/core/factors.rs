//! Adjustment factors applied to a base price per m².
//!
//! Every function here is total. The age, floor and bedroom functions return an
//! additive delta; callers turn it into a multiplier with `1.0 + delta`.

use crate::domain::model::PropertyType;

/// Per-year depreciation for each age band, paired with the band's upper bound.
const AGE_BANDS: [(f64, f64); 3] = [(5.0, 0.002), (20.0, 0.006), (40.0, 0.010)];
const AGE_RATE_OVER_40: f64 = 0.015;

const ELEVATOR_BASE_PREMIUM: f64 = 0.01;
const ELEVATOR_PREMIUM_PER_FLOOR: f64 = 0.001;
const ELEVATOR_PREMIUM_CAP: f64 = 0.03;
const ELEVATOR_MAX_PREMIUM_FLOOR: u32 = 8;

const WALKUP_FREE_FLOORS: u32 = 3;
const WALKUP_BASE_PENALTY: f64 = -0.02;
const WALKUP_PENALTY_PER_FLOOR: f64 = -0.006;

pub fn type_factor(property_type: &PropertyType) -> f64 {
    match property_type {
        PropertyType::Apartment => 1.00,
        PropertyType::House => 0.95,
        PropertyType::Land => 0.90,
        PropertyType::Other(_) => 1.00,
    }
}

/// Cumulative depreciation; each year is charged at the rate of the band it
/// falls in, so the curve is continuous at 5, 20 and 40 years. Fractional
/// ages are charged pro rata; negative or NaN ages carry no depreciation.
pub fn age_depreciation(age_years: f64) -> f64 {
    if !(age_years > 0.0) {
        return 0.0;
    }

    let mut delta = 0.0;
    let mut lower = 0.0;

    for (upper, rate) in AGE_BANDS {
        if age_years <= upper {
            return delta - rate * (age_years - lower);
        }
        delta -= rate * (upper - lower);
        lower = upper;
    }

    delta - AGE_RATE_OVER_40 * (age_years - lower)
}

pub fn floor_elevator_adjustment(floor_number: u32, has_elevator: bool) -> f64 {
    if floor_number < 1 {
        return 0.0;
    }

    if has_elevator {
        if floor_number > ELEVATOR_MAX_PREMIUM_FLOOR {
            // very high floors: premium neutralized
            return 0.0;
        }
        let premium =
            ELEVATOR_BASE_PREMIUM + ELEVATOR_PREMIUM_PER_FLOOR * (floor_number - 1) as f64;
        return premium.min(ELEVATOR_PREMIUM_CAP);
    }

    if floor_number <= WALKUP_FREE_FLOORS {
        return 0.0;
    }
    WALKUP_BASE_PENALTY + WALKUP_PENALTY_PER_FLOOR * (floor_number - 4) as f64
}

/// `None` is the three-bedroom baseline.
pub fn bedroom_adjustment(bedrooms: Option<u32>) -> f64 {
    match bedrooms {
        None | Some(3) => 0.0,
        Some(0) | Some(1) => -0.03,
        Some(2) => -0.01,
        Some(4) => 0.01,
        Some(_) => 0.02,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_type_factor_table() {
        assert_eq!(type_factor(&PropertyType::Apartment), 1.00);
        assert_eq!(type_factor(&PropertyType::House), 0.95);
        assert_eq!(type_factor(&PropertyType::Land), 0.90);
        assert_eq!(type_factor(&PropertyType::from("Oficina")), 1.00);
    }

    #[test]
    fn test_age_depreciation_bands() {
        assert_eq!(age_depreciation(0.0), 0.0);
        assert!(close(age_depreciation(3.0), -0.006));
        assert!(close(age_depreciation(5.0), -0.010));
        assert!(close(age_depreciation(12.0), -0.010 - 0.042));
        assert!(close(age_depreciation(20.0), -0.100));
        assert!(close(age_depreciation(30.0), -0.200));
        assert!(close(age_depreciation(40.0), -0.300));
        assert!(close(age_depreciation(50.0), -0.450));
    }

    #[test]
    fn test_age_depreciation_fractional_years() {
        assert!(close(age_depreciation(2.5), -0.005));
        assert!(close(age_depreciation(5.5), -0.010 - 0.003));
        assert!(close(age_depreciation(40.5), -0.300 - 0.0075));
    }

    #[test]
    fn test_age_depreciation_ignores_negative_and_nan() {
        assert_eq!(age_depreciation(-3.0), 0.0);
        assert_eq!(age_depreciation(f64::NAN), 0.0);
    }

    #[test]
    fn test_age_depreciation_continuous_at_breakpoints() {
        for breakpoint in [5.0, 20.0, 40.0] {
            let before = age_depreciation(breakpoint);
            let after = age_depreciation(breakpoint + 1.0);
            let step = before - after;
            // one year past a breakpoint costs at most the steepest band rate
            assert!(step > 0.0 && step <= AGE_RATE_OVER_40 + EPS, "jump at {}", breakpoint);
        }
    }

    #[test]
    fn test_age_depreciation_non_increasing() {
        let mut previous = age_depreciation(0.0);
        for age in 1..=120 {
            let current = age_depreciation(age as f64);
            assert!(current <= previous, "age {} increased", age);
            previous = current;
        }
    }

    #[test]
    fn test_floor_with_elevator() {
        assert_eq!(floor_elevator_adjustment(0, true), 0.0);
        assert!(close(floor_elevator_adjustment(1, true), 0.010));
        assert!(close(floor_elevator_adjustment(6, true), 0.015));
        assert!(close(floor_elevator_adjustment(8, true), 0.017));
        for floor in 9..60 {
            assert_eq!(floor_elevator_adjustment(floor, true), 0.0);
        }
    }

    #[test]
    fn test_floor_without_elevator() {
        assert_eq!(floor_elevator_adjustment(0, false), 0.0);
        assert_eq!(floor_elevator_adjustment(1, false), 0.0);
        assert_eq!(floor_elevator_adjustment(3, false), 0.0);
        assert!(close(floor_elevator_adjustment(4, false), -0.020));
        assert!(close(floor_elevator_adjustment(5, false), -0.026));
        assert!(close(floor_elevator_adjustment(10, false), -0.056));
    }

    #[test]
    fn test_bedroom_adjustment() {
        assert_eq!(bedroom_adjustment(None), 0.0);
        assert_eq!(bedroom_adjustment(Some(3)), 0.0);
        assert_eq!(bedroom_adjustment(Some(0)), -0.03);
        assert_eq!(bedroom_adjustment(Some(1)), -0.03);
        assert_eq!(bedroom_adjustment(Some(2)), -0.01);
        assert_eq!(bedroom_adjustment(Some(4)), 0.01);
        assert_eq!(bedroom_adjustment(Some(5)), 0.02);
        assert_eq!(bedroom_adjustment(Some(9)), 0.02);
    }
}
