use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use tracing::info;

use super::domain::{ShipDetails, ShipDraft, ShipType};
use super::validation::{prepare_for_create, ValidationError};

/// Failure while loading a fleet CSV.
#[derive(Debug, thiserror::Error)]
pub enum FleetImportError {
    #[error("failed to read fleet export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid fleet CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: production date '{value}' is not YYYY-MM-DD")]
    Date { row: usize, value: String },
    #[error("row {row}: unknown ship type '{value}'")]
    ShipType { row: usize, value: String },
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

/// Loads validated ships from a CSV export with the header
/// `name,planet,shipType,prodDate,isUsed,speed,crewSize`.
pub struct FleetImporter;

impl FleetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ShipDetails>, FleetImportError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let ships = Self::from_reader(file)?;
        info!(path = %path.display(), ships = ships.len(), "imported fleet CSV");
        Ok(ships)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ShipDetails>, FleetImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut ships = Vec::new();

        for (index, record) in csv_reader.deserialize::<FleetRow>().enumerate() {
            let row = index + 1;
            let draft = record?.into_draft(row)?;
            let details =
                prepare_for_create(draft).map_err(|source| FleetImportError::InvalidRow {
                    row,
                    source,
                })?;
            ships.push(details);
        }

        Ok(ships)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FleetRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    planet: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ship_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    prod_date: Option<String>,
    #[serde(default)]
    is_used: Option<bool>,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    crew_size: Option<i64>,
}

impl FleetRow {
    fn into_draft(self, row: usize) -> Result<ShipDraft, FleetImportError> {
        let ship_type = self
            .ship_type
            .map(|value| ShipType::parse(&value).ok_or(FleetImportError::ShipType { row, value }))
            .transpose()?;

        let prod_date = self
            .prod_date
            .map(|value| {
                NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|midnight| Utc.from_utc_datetime(&midnight))
                    .ok_or(FleetImportError::Date { row, value })
            })
            .transpose()?;

        Ok(ShipDraft {
            name: self.name,
            planet: self.planet,
            ship_type,
            prod_date,
            is_used: self.is_used,
            speed: self.speed,
            crew_size: self.crew_size,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|raw| !raw.trim().is_empty()))
}
