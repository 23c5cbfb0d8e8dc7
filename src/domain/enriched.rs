use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Customer fields captured on the enriched order at join time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub full_name: String,
    pub email: String,
    pub country: String,
}

/// Product fields captured on the enriched order at join time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub cost: f64,
}

/// An order left-joined with its customer and product plus derived monetary
/// fields. Orders with unresolved references keep `None` snapshots and
/// `None` monetary fields rather than being dropped, so downstream
/// aggregation sees every order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub order_day: NaiveDate,
    pub order_year: i32,
    pub order_month: u32,
    pub order_weekday: String,
    pub customer: Option<CustomerSnapshot>,
    pub product: Option<ProductSnapshot>,
    /// price * quantity, rounded to 2 decimals; None when the product
    /// reference is unresolved
    pub order_total: Option<f64>,
    /// cost * quantity, rounded to 2 decimals
    pub order_cost: Option<f64>,
    /// order_total - order_cost, rounded to 2 decimals
    pub order_profit: Option<f64>,
}
