use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Price per m² of every subzone in one district.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct District {
    #[serde(default)]
    pub zones: BTreeMap<String, f64>,
}

impl District {
    /// Unrounded mean of the zone prices, `None` for a district without zones.
    pub fn mean_price(&self) -> Option<f64> {
        if self.zones.is_empty() {
            return None;
        }
        Some(self.zones.values().sum::<f64>() / self.zones.len() as f64)
    }
}

/// District name -> subzone prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    pub districts: BTreeMap<String, District>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_zone(&mut self, district: &str, zone: &str, price: f64) {
        self.districts
            .entry(district.to_string())
            .or_default()
            .zones
            .insert(zone.to_string(), price);
    }

    pub fn district(&self, name: &str) -> Option<&District> {
        self.districts.get(name)
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

/// Externally published district averages. A missing district is not rebased.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceAverages {
    pub averages: BTreeMap<String, f64>,
}

impl ReferenceAverages {
    pub fn get(&self, district: &str) -> Option<f64> {
        self.averages.get(district).copied()
    }
}

impl FromIterator<(String, f64)> for ReferenceAverages {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            averages: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistrictStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl DistrictStats {
    /// Stats for a district the table knows nothing about beyond one price.
    pub fn degenerate(price: f64) -> Self {
        Self {
            min: price,
            max: price,
            avg: price,
        }
    }
}

pub type DistrictStatsMap = BTreeMap<String, DistrictStats>;

/// Property kinds priced by the model. Labels outside the known set are kept
/// as `Other` and priced like an apartment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    Apartment,
    House,
    Land,
    Other(String),
}

impl PropertyType {
    pub fn is_land(&self) -> bool {
        matches!(self, PropertyType::Land)
    }
}

impl From<&str> for PropertyType {
    fn from(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "departamento" | "apartment" => PropertyType::Apartment,
            "casa" | "house" => PropertyType::House,
            "terreno" | "land" => PropertyType::Land,
            _ => PropertyType::Other(label.trim().to_string()),
        }
    }
}

impl From<String> for PropertyType {
    fn from(label: String) -> Self {
        PropertyType::from(label.as_str())
    }
}

impl From<PropertyType> for String {
    fn from(property_type: PropertyType) -> Self {
        property_type.to_string()
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Apartment => write!(f, "Departamento"),
            PropertyType::House => write!(f, "Casa"),
            PropertyType::Land => write!(f, "Terreno"),
            PropertyType::Other(label) => write!(f, "{}", label),
        }
    }
}

fn default_floor_number() -> u32 {
    1
}

fn default_bedrooms() -> Option<u32> {
    Some(3)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRequest {
    pub district: String,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    pub covered_area_m2: Option<f64>,
    #[serde(default)]
    pub land_area_m2: Option<f64>,
    /// Building age; fractional years are accepted.
    #[serde(default)]
    pub age_years: f64,
    #[serde(default = "default_floor_number")]
    pub floor_number: u32,
    #[serde(default)]
    pub has_elevator: bool,
    /// `None` is treated as the three-bedroom baseline.
    #[serde(default = "default_bedrooms")]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub include_second_currency: bool,
}

impl ValuationRequest {
    pub fn new(district: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            district: district.into(),
            zone: None,
            property_type: Some(property_type),
            covered_area_m2: None,
            land_area_m2: None,
            age_years: 0.0,
            floor_number: default_floor_number(),
            has_elevator: false,
            bedrooms: default_bedrooms(),
            include_second_currency: false,
        }
    }

    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn covered_area(mut self, area_m2: f64) -> Self {
        self.covered_area_m2 = Some(area_m2);
        self
    }

    pub fn land_area(mut self, area_m2: f64) -> Self {
        self.land_area_m2 = Some(area_m2);
        self
    }

    pub fn age(mut self, years: f64) -> Self {
        self.age_years = years;
        self
    }

    pub fn floor(mut self, floor_number: u32, has_elevator: bool) -> Self {
        self.floor_number = floor_number;
        self.has_elevator = has_elevator;
        self
    }

    pub fn bedrooms(mut self, bedrooms: u32) -> Self {
        self.bedrooms = Some(bedrooms);
        self
    }

    pub fn with_second_currency(mut self) -> Self {
        self.include_second_currency = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Multipliers applied to the base unit price, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub type_factor: f64,
    pub age_factor: f64,
    pub floor_factor: f64,
    pub bedroom_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Live,
    /// Configured constant, no lookup attempted.
    Fixed,
    Fallback,
}

/// An exchange rate expressed as primary-currency units per one
/// second-currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub rate: f64,
    pub source: RateSource,
    pub fetched_at: DateTime<Utc>,
}

impl RateQuote {
    pub fn live(rate: f64) -> Self {
        Self {
            rate,
            source: RateSource::Live,
            fetched_at: Utc::now(),
        }
    }

    pub fn fixed(rate: f64) -> Self {
        Self {
            rate,
            source: RateSource::Fixed,
            fetched_at: Utc::now(),
        }
    }

    pub fn fallback(rate: f64) -> Self {
        Self {
            rate,
            source: RateSource::Fallback,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RateSource::Fallback
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondCurrencyRange {
    pub currency: String,
    pub rate: f64,
    pub rate_source: RateSource,
    pub fetched_at: DateTime<Utc>,
    pub range: PriceRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub district: String,
    /// Zone whose price was used directly; `None` when the district average was used.
    pub zone: Option<String>,
    pub property_type: PropertyType,
    pub base_unit_price: f64,
    pub adjusted_unit_price: f64,
    pub applied_area_m2: f64,
    pub subtotal: f64,
    pub range: PriceRange,
    pub tolerance_used_pct: f64,
    pub factors: FactorBreakdown,
    pub district_stats: DistrictStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_currency: Option<SecondCurrencyRange>,
}
