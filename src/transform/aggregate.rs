use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{
    ActivityStatus, Customer, CustomerDimension, CustomerSegment, EnrichedOrder, PriceSegment,
    Product, ProductDimension, SalesTier,
};

use super::round2;

// Classification thresholds are evaluated top-down, first match wins, with
// inclusive lower bounds.

pub fn classify_segment(lifetime_value: f64) -> CustomerSegment {
    if lifetime_value >= 500.0 {
        CustomerSegment::Platinum
    } else if lifetime_value >= 250.0 {
        CustomerSegment::Gold
    } else if lifetime_value >= 100.0 {
        CustomerSegment::Silver
    } else {
        CustomerSegment::Bronze
    }
}

pub fn classify_activity(
    last_order_date: Option<DateTime<Utc>>,
    as_of: DateTime<Utc>,
) -> ActivityStatus {
    match last_order_date {
        None => ActivityStatus::NeverPurchased,
        Some(last) => {
            let days = (as_of - last).num_days();
            if days <= 90 {
                ActivityStatus::Active
            } else if days <= 180 {
                ActivityStatus::AtRisk
            } else {
                ActivityStatus::Churned
            }
        }
    }
}

pub fn classify_sales_tier(total_quantity_sold: i64) -> SalesTier {
    if total_quantity_sold >= 10 {
        SalesTier::BestSeller
    } else if total_quantity_sold >= 5 {
        SalesTier::GoodPerformer
    } else if total_quantity_sold >= 1 {
        SalesTier::Moderate
    } else {
        SalesTier::NoSales
    }
}

pub fn classify_price_segment(price: f64) -> PriceSegment {
    if price >= 200.0 {
        PriceSegment::Premium
    } else if price >= 100.0 {
        PriceSegment::MidRange
    } else if price >= 50.0 {
        PriceSegment::Economy
    } else {
        PriceSegment::Budget
    }
}

/// Running aggregate over one entity's enriched orders
#[derive(Debug, Default)]
struct OrderStats {
    total_orders: i64,
    total_quantity: i64,
    /// Sum over orders with a resolved total; unresolved orders still count
    /// toward total_orders
    value_sum: f64,
    value_count: i64,
    profit_sum: f64,
    first_order_date: Option<DateTime<Utc>>,
    last_order_date: Option<DateTime<Utc>>,
    completed_orders: i64,
    categories: HashSet<String>,
    customers: HashSet<String>,
}

impl OrderStats {
    fn observe(&mut self, order: &EnrichedOrder) {
        self.total_orders += 1;
        self.total_quantity += order.quantity;
        if let Some(total) = order.order_total {
            self.value_sum += total;
            self.value_count += 1;
        }
        if let Some(profit) = order.order_profit {
            self.profit_sum += profit;
        }
        self.first_order_date = Some(match self.first_order_date {
            Some(first) => first.min(order.order_date),
            None => order.order_date,
        });
        self.last_order_date = Some(match self.last_order_date {
            Some(last) => last.max(order.order_date),
            None => order.order_date,
        });
        if order.status == "completed" {
            self.completed_orders += 1;
        }
        if let Some(product) = &order.product {
            self.categories.insert(product.category.clone());
        }
        self.customers.insert(order.customer_id.clone());
    }

    fn avg_order_value(&self) -> f64 {
        if self.value_count > 0 {
            round2(self.value_sum / self.value_count as f64)
        } else {
            0.0
        }
    }

    fn completion_rate(&self) -> f64 {
        if self.total_orders > 0 {
            round2(self.completed_orders as f64 / self.total_orders as f64 * 100.0)
        } else {
            0.0
        }
    }
}

fn group_orders<'a, K>(enriched: &'a [EnrichedOrder], key: K) -> HashMap<&'a str, OrderStats>
where
    K: Fn(&'a EnrichedOrder) -> &'a str,
{
    let mut grouped: HashMap<&str, OrderStats> = HashMap::new();
    for order in enriched {
        grouped.entry(key(order)).or_default().observe(order);
    }
    grouped
}

/// Build the customer dimension: every deduplicated customer, joined
/// against its lifetime order aggregates and classified. Customers with no
/// orders carry zeroed metrics and null order dates.
pub fn build_customer_dimension(
    customers: &[Customer],
    enriched: &[EnrichedOrder],
    as_of: DateTime<Utc>,
) -> Vec<CustomerDimension> {
    let grouped = group_orders(enriched, |o| o.customer_id.as_str());
    let empty = OrderStats::default();

    let dimension: Vec<CustomerDimension> = customers
        .iter()
        .map(|c| {
            let stats = grouped.get(c.customer_id.as_str()).unwrap_or(&empty);
            let lifetime_value = round2(stats.value_sum);
            CustomerDimension {
                customer_id: c.customer_id.clone(),
                full_name: c.full_name.clone(),
                email: c.email.clone(),
                country: c.country.clone(),
                created_at: c.created_at,
                total_orders: stats.total_orders,
                total_quantity: stats.total_quantity,
                lifetime_value,
                total_profit: round2(stats.profit_sum),
                avg_order_value: stats.avg_order_value(),
                first_order_date: stats.first_order_date,
                last_order_date: stats.last_order_date,
                distinct_categories: stats.categories.len() as i64,
                completed_orders: stats.completed_orders,
                completion_rate: stats.completion_rate(),
                segment: classify_segment(lifetime_value),
                activity_status: classify_activity(stats.last_order_date, as_of),
            }
        })
        .collect();

    debug!(
        "Built customer dimension: {} customers, {} with orders",
        dimension.len(),
        grouped.len()
    );
    dimension
}

/// Build the product dimension: every deduplicated product, joined against
/// its lifetime sales aggregates and classified. Products never ordered
/// carry zeroed metrics and the No Sales tier.
pub fn build_product_dimension(
    products: &[Product],
    enriched: &[EnrichedOrder],
) -> Vec<ProductDimension> {
    let grouped = group_orders(enriched, |o| o.product_id.as_str());
    let empty = OrderStats::default();

    let dimension: Vec<ProductDimension> = products
        .iter()
        .map(|p| {
            let stats = grouped.get(p.product_id.as_str()).unwrap_or(&empty);
            ProductDimension {
                product_id: p.product_id.clone(),
                product_name: p.product_name.clone(),
                category: p.category.clone(),
                price: p.price,
                cost: p.cost,
                profit_per_unit: p.profit_per_unit,
                profit_margin_pct: p.profit_margin_pct,
                total_orders: stats.total_orders,
                total_quantity_sold: stats.total_quantity,
                total_revenue: round2(stats.value_sum),
                total_profit: round2(stats.profit_sum),
                avg_order_value: stats.avg_order_value(),
                first_order_date: stats.first_order_date,
                last_order_date: stats.last_order_date,
                distinct_customers: stats.customers.len() as i64,
                completed_orders: stats.completed_orders,
                completion_rate: stats.completion_rate(),
                sales_tier: classify_sales_tier(stats.total_quantity),
                price_segment: classify_price_segment(p.price),
            }
        })
        .collect();

    debug!(
        "Built product dimension: {} products, {} with orders",
        dimension.len(),
        grouped.len()
    );
    dimension
}
