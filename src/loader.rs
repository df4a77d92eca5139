//! CSV ingest for city trip files.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::schema::CitySchema;

/// One row as it appears in a source CSV. Washington's file has no `Gender`
/// or `Birth Year` columns, so both default to `None` there; the source
/// stores birth years as floats.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "Start Time")]
    pub start_time: String,

    #[serde(rename = "Start Station")]
    pub start_station: String,

    #[serde(rename = "End Station")]
    pub end_station: String,

    #[serde(rename = "Trip Duration")]
    pub trip_duration: f64,

    #[serde(rename = "User Type", default)]
    pub user_type: Option<String>,

    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,

    #[serde(rename = "Birth Year", default)]
    pub birth_year: Option<f64>,
}

/// Reads every trip row for a city from `data_dir`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row fails to
/// deserialize.
pub fn load_trips(schema: &CitySchema, data_dir: &Path) -> Result<Vec<RawTrip>> {
    let path = data_dir.join(schema.data_file);
    debug!(path = %path.display(), city = %schema.city, "Reading trip file");

    let mut rdr = csv::Reader::from_path(&path)
        .with_context(|| format!("opening trip file {}", path.display()))?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawTrip = result?;
        rows.push(row);
    }

    debug!(rows = rows.len(), "Trip file read");
    Ok(rows)
}
