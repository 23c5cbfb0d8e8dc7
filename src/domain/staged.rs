use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Deduplicated, cleaned customer record. Exactly one logical customer per
/// `customer_id` survives deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Trimmed first name + space + trimmed last name
    pub full_name: String,
    /// Normalized to lowercase
    pub email: String,
    pub country: String,
    pub created_at: Option<DateTime<Utc>>,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
}

/// Deduplicated, cleaned product record with derived profit metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    /// Rounded to 2 decimal places
    pub price: f64,
    /// Rounded to 2 decimal places
    pub cost: f64,
    /// price - cost
    pub profit_per_unit: f64,
    /// profit_per_unit / price * 100, defined as 0 when price is 0
    pub profit_margin_pct: f64,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
}

/// Deduplicated, cleaned order record with the order timestamp decomposed
/// into calendar fields for downstream reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Normalized to lowercase
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub order_day: NaiveDate,
    pub order_year: i32,
    pub order_month: u32,
    /// Full weekday name, e.g. "Monday"
    pub order_weekday: String,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
}
