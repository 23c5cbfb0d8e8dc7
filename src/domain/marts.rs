use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer value segment, by lifetime value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerSegment {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

/// Customer recency classification, relative to the evaluation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    Active,
    AtRisk,
    Churned,
    NeverPurchased,
}

/// Product volume classification, by units sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesTier {
    BestSeller,
    GoodPerformer,
    Moderate,
    NoSales,
}

/// Product price band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSegment {
    Premium,
    MidRange,
    Economy,
    Budget,
}

/// Order size classification, by order total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderValueTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CustomerSegment::Platinum => "Platinum",
            CustomerSegment::Gold => "Gold",
            CustomerSegment::Silver => "Silver",
            CustomerSegment::Bronze => "Bronze",
        };
        write!(f, "{}", label)
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityStatus::Active => "Active",
            ActivityStatus::AtRisk => "At Risk",
            ActivityStatus::Churned => "Churned",
            ActivityStatus::NeverPurchased => "Never Purchased",
        };
        write!(f, "{}", label)
    }
}

impl fmt::Display for SalesTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SalesTier::BestSeller => "Best Seller",
            SalesTier::GoodPerformer => "Good Performer",
            SalesTier::Moderate => "Moderate",
            SalesTier::NoSales => "No Sales",
        };
        write!(f, "{}", label)
    }
}

impl fmt::Display for PriceSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriceSegment::Premium => "Premium",
            PriceSegment::MidRange => "Mid-Range",
            PriceSegment::Economy => "Economy",
            PriceSegment::Budget => "Budget",
        };
        write!(f, "{}", label)
    }
}

impl fmt::Display for OrderValueTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderValueTier::High => "High",
            OrderValueTier::Medium => "Medium",
            OrderValueTier::Low => "Low",
        };
        write!(f, "{}", label)
    }
}

/// Customer enriched with lifetime order metrics and classifications.
/// Every deduplicated customer appears here, purchasing history or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDimension {
    pub customer_id: String,
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub created_at: Option<DateTime<Utc>>,
    pub total_orders: i64,
    pub total_quantity: i64,
    /// Sum of resolved order totals
    pub lifetime_value: f64,
    pub total_profit: f64,
    /// Average over orders with a resolved total, 0 when there are none
    pub avg_order_value: f64,
    pub first_order_date: Option<DateTime<Utc>>,
    pub last_order_date: Option<DateTime<Utc>>,
    /// Number of distinct product categories purchased
    pub distinct_categories: i64,
    pub completed_orders: i64,
    /// completed_orders / total_orders * 100, 0 when there are no orders
    pub completion_rate: f64,
    pub segment: CustomerSegment,
    pub activity_status: ActivityStatus,
}

/// Product enriched with lifetime sales metrics and classifications.
/// Every deduplicated product appears here, sold or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDimension {
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub cost: f64,
    pub profit_per_unit: f64,
    pub profit_margin_pct: f64,
    pub total_orders: i64,
    pub total_quantity_sold: i64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub avg_order_value: f64,
    pub first_order_date: Option<DateTime<Utc>>,
    pub last_order_date: Option<DateTime<Utc>>,
    /// Number of distinct customers who ordered this product
    pub distinct_customers: i64,
    pub completed_orders: i64,
    pub completion_rate: f64,
    pub sales_tier: SalesTier,
    pub price_segment: PriceSegment,
}

/// Flattened order fact row for reporting. One row per deduplicated order;
/// unresolved customer/product references surface as `None` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactOrder {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    pub customer_name: Option<String>,
    pub customer_country: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub unit_price: Option<f64>,
    pub quantity: i64,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub order_day: NaiveDate,
    pub order_year: i32,
    pub order_month: u32,
    pub order_weekday: String,
    pub order_total: Option<f64>,
    pub order_cost: Option<f64>,
    pub order_profit: Option<f64>,
    pub is_completed: bool,
    pub order_value_tier: OrderValueTier,
}
