//! Observation records and their annotated output rows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One animal-observation record to annotate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque record identifier
    #[serde(rename = "event_id")]
    pub id: String,

    /// Observation date (ISO `YYYY-MM-DD`)
    pub date: NaiveDate,

    /// Latitude in degrees
    #[serde(rename = "latitude")]
    pub lat: f64,

    /// Longitude in degrees
    #[serde(rename = "longitude")]
    pub lng: f64,
}

impl Record {
    pub fn new(id: impl Into<String>, date: NaiveDate, lat: f64, lng: f64) -> Self {
        Self { id: id.into(), date, lat, lng }
    }

    /// Calendar month of the observation (1..=12)
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// One output row: the input record echoed with its sampled value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "event_id")]
    pub id: String,

    pub date: NaiveDate,

    #[serde(rename = "latitude")]
    pub lat: f64,

    #[serde(rename = "longitude")]
    pub lng: f64,

    /// Sampled value; None when the point has no coverage
    #[serde(rename = "evi")]
    pub value: Option<f64>,
}

impl Annotation {
    /// Build an annotation echoing the record's fields unchanged
    pub fn for_record(record: &Record, value: Option<f64>) -> Self {
        Self {
            id: record.id.clone(),
            date: record.date,
            lat: record.lat,
            lng: record.lng,
            value,
        }
    }
}
