use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod api;
pub mod csv;

pub use api::ApiExtractor;
pub use csv::CsvExtractor;

/// Core trait all raw-record sources implement. Extractors return loosely
/// typed JSON records stamped with ingestion metadata; validation and
/// typed decoding happen downstream.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Identifier recorded in the `_source` column of every extracted row
    fn source_name(&self) -> &str;

    /// Fetch all records from this source
    async fn extract(&self) -> Result<Vec<Value>>;
}

/// Stamp ingestion metadata onto each extracted record
pub fn stamp_records(records: &mut [Value], source: &str, loaded_at: DateTime<Utc>) {
    for record in records.iter_mut() {
        if let Some(object) = record.as_object_mut() {
            object.insert("_loaded_at".to_string(), Value::String(loaded_at.to_rfc3339()));
            object.insert("_source".to_string(), Value::String(source.to_string()));
        }
    }
}

/// Decode stamped JSON records into typed raw rows
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>> {
    let decoded = serde_json::from_value(Value::Array(rows))?;
    Ok(decoded)
}

/// Parse a timestamp in any of the formats the source files use.
/// Dates without a time component resolve to midnight UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(parsed.and_time(NaiveTime::MIN).and_utc());
    }
    None
}
