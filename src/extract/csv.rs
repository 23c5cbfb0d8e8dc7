use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Number, Value};
use tracing::info;

use crate::error::{Result, WarehouseError};

use super::{parse_datetime, stamp_records, Extractor};

/// Extractor for CSV file sources. Field values are inferred as integers,
/// floats or strings; columns listed in `parse_dates` are normalized to
/// RFC 3339 timestamps so typed decoding accepts them.
pub struct CsvExtractor {
    file_path: PathBuf,
    source_name: String,
    delimiter: u8,
    parse_dates: Vec<String>,
}

impl CsvExtractor {
    pub fn new(file_path: impl AsRef<Path>, source_name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            source_name: source_name.into(),
            delimiter: b',',
            parse_dates: Vec::new(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_parse_dates(mut self, columns: &[&str]) -> Self {
        self.parse_dates = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    fn infer_value(&self, column: &str, field: &str) -> Value {
        if field.is_empty() {
            return Value::Null;
        }
        if self.parse_dates.iter().any(|c| c == column) {
            if let Some(parsed) = parse_datetime(field) {
                return Value::String(parsed.to_rfc3339());
            }
            return Value::Null;
        }
        if let Ok(int) = field.parse::<i64>() {
            return Value::Number(int.into());
        }
        if let Ok(float) = field.parse::<f64>() {
            if let Some(number) = Number::from_f64(float) {
                return Value::Number(number);
            }
        }
        Value::String(field.to_string())
    }
}

#[async_trait]
impl Extractor for CsvExtractor {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    async fn extract(&self) -> Result<Vec<Value>> {
        info!("Extracting data from {}", self.file_path.display());

        if !self.file_path.exists() {
            return Err(WarehouseError::Source {
                message: format!("File not found: {}", self.file_path.display()),
            });
        }

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&self.file_path)?;
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut object = Map::new();
            for (column, field) in headers.iter().zip(row.iter()) {
                object.insert(column.to_string(), self.infer_value(column, field));
            }
            records.push(Value::Object(object));
        }

        stamp_records(&mut records, &self.source_name, Utc::now());
        info!(
            "Extracted {} rows from {}",
            records.len(),
            self.file_path.display()
        );
        Ok(records)
    }
}
