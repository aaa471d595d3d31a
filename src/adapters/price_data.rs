use crate::core::Storage;
use crate::domain::model::{PriceTable, ReferenceAverages};
use crate::utils::error::{Result, ValuationError};
use crate::utils::validation::{validate_file_extension, Validate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PriceRow {
    district: String,
    zone: String,
    price_per_m2: f64,
}

impl Validate for PriceTable {
    fn validate(&self) -> Result<()> {
        for (district, payload) in &self.districts {
            for (zone, price) in &payload.zones {
                if !price.is_finite() || *price <= 0.0 {
                    return Err(ValuationError::ValidationError {
                        message: format!(
                            "price for {} / {} must be positive, got {}",
                            district, zone, price
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Validate for ReferenceAverages {
    fn validate(&self) -> Result<()> {
        for (district, avg) in &self.averages {
            if !avg.is_finite() || *avg <= 0.0 {
                return Err(ValuationError::ValidationError {
                    message: format!("reference average for {} must be positive, got {}", district, avg),
                });
            }
        }
        Ok(())
    }
}

/// `{ "District": { "zones": { "Zone": 8500 } } }`
pub fn parse_price_table_json(bytes: &[u8]) -> Result<PriceTable> {
    let table: PriceTable = serde_json::from_slice(bytes)?;
    table.validate()?;
    Ok(table)
}

/// CSV with the header `district,zone,price_per_m2`.
pub fn parse_price_table_csv(bytes: &[u8]) -> Result<PriceTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut table = PriceTable::new();
    for row in reader.deserialize() {
        let row: PriceRow = row?;
        table.insert_zone(&row.district, &row.zone, row.price_per_m2);
    }

    table.validate()?;
    Ok(table)
}

/// `{ "District": 8735 }`
pub fn parse_reference_averages_json(bytes: &[u8]) -> Result<ReferenceAverages> {
    let references: ReferenceAverages = serde_json::from_slice(bytes)?;
    references.validate()?;
    Ok(references)
}

/// Loads a price table through `storage`, picking the parser by extension.
pub async fn load_price_table<S: Storage>(storage: &S, path: &str) -> Result<PriceTable> {
    validate_file_extension("data.price_table", path, &["json", "csv"])?;
    let bytes = storage.read_file(path).await?;

    let table = if path.to_ascii_lowercase().ends_with(".csv") {
        parse_price_table_csv(&bytes)?
    } else {
        parse_price_table_json(&bytes)?
    };

    let zones: usize = table.districts.values().map(|d| d.zones.len()).sum();
    tracing::info!("📁 Loaded price table {}: {} districts, {} zones", path, table.len(), zones);
    Ok(table)
}

pub async fn load_reference_averages<S: Storage>(
    storage: &S,
    path: &str,
) -> Result<ReferenceAverages> {
    validate_file_extension("data.reference_averages", path, &["json"])?;
    let bytes = storage.read_file(path).await?;
    let references = parse_reference_averages_json(&bytes)?;
    tracing::info!(
        "📁 Loaded {} reference averages from {}",
        references.averages.len(),
        path
    );
    Ok(references)
}
