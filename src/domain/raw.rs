use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw customer row as delivered by extraction. Duplicates persist here;
/// `loaded_at` disambiguates them downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCustomer {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    pub created_at: Option<DateTime<Utc>>,
    /// When this row was ingested
    #[serde(rename = "_loaded_at")]
    pub loaded_at: DateTime<Utc>,
    /// Which extractor produced this row
    #[serde(rename = "_source")]
    pub source: String,
}

/// Raw product row as delivered by extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub cost: f64,
    #[serde(rename = "_loaded_at")]
    pub loaded_at: DateTime<Utc>,
    #[serde(rename = "_source")]
    pub source: String,
}

/// Raw order row as delivered by extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub order_date: DateTime<Utc>,
    pub status: String,
    #[serde(rename = "_loaded_at")]
    pub loaded_at: DateTime<Utc>,
    #[serde(rename = "_source")]
    pub source: String,
}
