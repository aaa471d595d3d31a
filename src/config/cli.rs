use crate::config::toml_config::ValuationConfig;
use crate::domain::model::{PropertyType, ValuationRequest};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "tasador")]
#[command(about = "Estimate a market price range for a property in Lima")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the data files (overrides data.base_dir)
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Price table, .json or .csv (overrides data.price_table)
    #[arg(long)]
    pub prices: Option<String>,

    /// District reference averages, .json (overrides data.reference_averages)
    #[arg(long)]
    pub references: Option<String>,

    /// Print the per-district stats of the rebased table and exit
    #[arg(long)]
    pub list_districts: bool,

    #[arg(long)]
    pub district: Option<String>,

    #[arg(long)]
    pub zone: Option<String>,

    /// Departamento, Casa or Terreno
    #[arg(long, default_value = "Departamento")]
    pub property_type: String,

    #[arg(long)]
    pub covered_area: Option<f64>,

    #[arg(long)]
    pub land_area: Option<f64>,

    #[arg(long, default_value = "0")]
    pub age: f64,

    #[arg(long, default_value = "1")]
    pub floor: u32,

    #[arg(long)]
    pub elevator: bool,

    #[arg(long, default_value = "3")]
    pub bedrooms: u32,

    /// Also express the range in the second currency
    #[arg(long)]
    pub second_currency: bool,

    /// Use the fallback exchange rate without calling the API
    #[arg(long)]
    pub offline: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads the configuration file (if any) and applies the command line overrides.
    pub fn resolve_config(&self) -> crate::utils::error::Result<ValuationConfig> {
        let mut config = match &self.config {
            Some(path) => ValuationConfig::from_file(path)?,
            None => ValuationConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.data.base_dir = dir.clone();
        }
        if let Some(prices) = &self.prices {
            config.data.price_table = Some(prices.clone());
        }
        if let Some(references) = &self.references {
            config.data.reference_averages = Some(references.clone());
        }
        if self.offline {
            config.currency.offline = true;
        }

        Ok(config)
    }

    /// The valuation request described by the flags, if a district was given.
    pub fn request(&self) -> Option<ValuationRequest> {
        let district = self.district.as_ref()?;

        let mut request = ValuationRequest::new(
            district.clone(),
            PropertyType::from(self.property_type.as_str()),
        )
        .age(self.age)
        .floor(self.floor, self.elevator)
        .bedrooms(self.bedrooms);

        request.zone = self.zone.clone();
        request.covered_area_m2 = self.covered_area;
        request.land_area_m2 = self.land_area;
        request.include_second_currency = self.second_currency;
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_flags() {
        let cli = CliConfig::parse_from([
            "tasador",
            "--district",
            "Miraflores",
            "--covered-area",
            "80",
            "--age",
            "12.5",
            "--floor",
            "6",
            "--elevator",
            "--second-currency",
        ]);

        let request = cli.request().unwrap();

        assert_eq!(request.district, "Miraflores");
        assert_eq!(request.property_type, Some(PropertyType::Apartment));
        assert_eq!(request.covered_area_m2, Some(80.0));
        assert_eq!(request.age_years, 12.5);
        assert_eq!(request.floor_number, 6);
        assert!(request.has_elevator);
        assert_eq!(request.bedrooms, Some(3));
        assert!(request.include_second_currency);
    }

    #[test]
    fn test_no_district_means_no_request() {
        let cli = CliConfig::parse_from(["tasador", "--list-districts"]);
        assert!(cli.request().is_none());
    }

    #[test]
    fn test_overrides_apply_without_file() {
        let cli = CliConfig::parse_from([
            "tasador",
            "--data-dir",
            "demos",
            "--prices",
            "price_table.csv",
            "--offline",
        ]);

        let config = cli.resolve_config().unwrap();

        assert_eq!(config.data.base_dir, "demos");
        assert_eq!(config.price_table_path(), Some("price_table.csv"));
        assert!(config.currency.offline);
    }
}
