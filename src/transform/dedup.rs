use std::collections::HashMap;

use chrono::Datelike;
use tracing::debug;

use crate::domain::{Customer, Order, Product, RawCustomer, RawOrder, RawProduct};

use super::round2;

// Each dedup function partitions raw rows by natural key and keeps the row
// with the maximum loaded_at. When two rows for the same key carry an
// identical loaded_at, the later input row wins, so re-runs over unchanged
// raw data stay deterministic. Output is sorted by key.

/// Collapse raw customer rows to one cleaned row per customer_id,
/// keeping the most recently loaded version
pub fn dedup_customers(raw: &[RawCustomer]) -> Vec<Customer> {
    let mut latest: HashMap<&str, &RawCustomer> = HashMap::new();
    for row in raw {
        let newer = match latest.get(row.customer_id.as_str()) {
            Some(current) => row.loaded_at >= current.loaded_at,
            None => true,
        };
        if newer {
            latest.insert(row.customer_id.as_str(), row);
        }
    }

    let mut staged: Vec<Customer> = latest
        .into_values()
        .map(|r| {
            let first_name = r.first_name.trim().to_string();
            let last_name = r.last_name.trim().to_string();
            let full_name = format!("{} {}", first_name, last_name);
            Customer {
                customer_id: r.customer_id.trim().to_string(),
                first_name,
                last_name,
                full_name,
                email: r.email.trim().to_lowercase(),
                country: r.country.trim().to_string(),
                created_at: r.created_at,
                loaded_at: r.loaded_at,
                source: r.source.clone(),
            }
        })
        .collect();
    staged.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));

    debug!("Deduplicated {} raw customers to {}", raw.len(), staged.len());
    staged
}

/// Collapse raw product rows to one cleaned row per product_id, deriving
/// the per-unit profit metrics
pub fn dedup_products(raw: &[RawProduct]) -> Vec<Product> {
    let mut latest: HashMap<&str, &RawProduct> = HashMap::new();
    for row in raw {
        let newer = match latest.get(row.product_id.as_str()) {
            Some(current) => row.loaded_at >= current.loaded_at,
            None => true,
        };
        if newer {
            latest.insert(row.product_id.as_str(), row);
        }
    }

    let mut staged: Vec<Product> = latest
        .into_values()
        .map(|r| {
            let price = round2(r.price);
            let cost = round2(r.cost);
            let profit_per_unit = round2(price - cost);
            // A free product has no margin rather than a divide-by-zero
            let profit_margin_pct = if price == 0.0 {
                0.0
            } else {
                round2(profit_per_unit / price * 100.0)
            };
            Product {
                product_id: r.product_id.trim().to_string(),
                product_name: r.product_name.trim().to_string(),
                category: r.category.trim().to_string(),
                price,
                cost,
                profit_per_unit,
                profit_margin_pct,
                loaded_at: r.loaded_at,
                source: r.source.clone(),
            }
        })
        .collect();
    staged.sort_by(|a, b| a.product_id.cmp(&b.product_id));

    debug!("Deduplicated {} raw products to {}", raw.len(), staged.len());
    staged
}

/// Collapse raw order rows to one cleaned row per order_id, decomposing the
/// order timestamp into calendar fields
pub fn dedup_orders(raw: &[RawOrder]) -> Vec<Order> {
    let mut latest: HashMap<&str, &RawOrder> = HashMap::new();
    for row in raw {
        let newer = match latest.get(row.order_id.as_str()) {
            Some(current) => row.loaded_at >= current.loaded_at,
            None => true,
        };
        if newer {
            latest.insert(row.order_id.as_str(), row);
        }
    }

    let mut staged: Vec<Order> = latest
        .into_values()
        .map(|r| Order {
            order_id: r.order_id.trim().to_string(),
            customer_id: r.customer_id.trim().to_string(),
            product_id: r.product_id.trim().to_string(),
            quantity: r.quantity,
            status: r.status.trim().to_lowercase(),
            order_date: r.order_date,
            order_day: r.order_date.date_naive(),
            order_year: r.order_date.year(),
            order_month: r.order_date.month(),
            order_weekday: r.order_date.format("%A").to_string(),
            loaded_at: r.loaded_at,
            source: r.source.clone(),
        })
        .collect();
    staged.sort_by(|a, b| a.order_id.cmp(&b.order_id));

    debug!("Deduplicated {} raw orders to {}", raw.len(), staged.len());
    staged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn raw_customer(id: &str, country: &str, loaded_at: DateTime<Utc>) -> RawCustomer {
        RawCustomer {
            customer_id: id.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            country: country.to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            loaded_at,
            source: "csv_customers".to_string(),
        }
    }

    fn raw_product(id: &str, price: f64, cost: f64) -> RawProduct {
        RawProduct {
            product_id: id.to_string(),
            product_name: "Widget".to_string(),
            category: "Gadgets".to_string(),
            price,
            cost,
            loaded_at: ts("2024-03-01T00:00:00Z"),
            source: "csv_products".to_string(),
        }
    }

    #[test]
    fn test_latest_loaded_row_wins() {
        let rows = vec![
            raw_customer("C1", "US", ts("2024-03-01T00:00:00Z")),
            raw_customer("C1", "DE", ts("2024-03-02T00:00:00Z")),
            raw_customer("C2", "FR", ts("2024-03-01T00:00:00Z")),
        ];

        let staged = dedup_customers(&rows);

        assert_eq!(staged.len(), 2);
        assert_eq!(staged[0].customer_id, "C1");
        assert_eq!(staged[0].country, "DE");
        assert_eq!(staged[1].customer_id, "C2");
    }

    #[test]
    fn test_latest_wins_regardless_of_input_order() {
        let rows = vec![
            raw_customer("C1", "DE", ts("2024-03-02T00:00:00Z")),
            raw_customer("C1", "US", ts("2024-03-01T00:00:00Z")),
        ];

        let staged = dedup_customers(&rows);

        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].country, "DE");
    }

    #[test]
    fn test_equal_loaded_at_prefers_later_input_row() {
        let same = ts("2024-03-01T00:00:00Z");
        let rows = vec![
            raw_customer("C1", "US", same),
            raw_customer("C1", "DE", same),
        ];

        let staged = dedup_customers(&rows);

        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].country, "DE");
    }

    #[test]
    fn test_customer_normalization() {
        let mut row = raw_customer("C1", "  US  ", ts("2024-03-01T00:00:00Z"));
        row.first_name = "  Ada ".to_string();
        row.last_name = " Lovelace  ".to_string();
        row.email = "  Ada@Example.COM ".to_string();

        let staged = dedup_customers(&[row]);

        assert_eq!(staged[0].first_name, "Ada");
        assert_eq!(staged[0].full_name, "Ada Lovelace");
        assert_eq!(staged[0].email, "ada@example.com");
        assert_eq!(staged[0].country, "US");
    }

    #[test]
    fn test_product_profit_metrics() {
        let staged = dedup_products(&[raw_product("P1", 19.999, 10.0)]);

        assert_eq!(staged[0].price, 20.0);
        assert_eq!(staged[0].cost, 10.0);
        assert_eq!(staged[0].profit_per_unit, 10.0);
        assert_eq!(staged[0].profit_margin_pct, 50.0);
    }

    #[test]
    fn test_zero_price_product_has_zero_margin() {
        let staged = dedup_products(&[raw_product("P1", 0.0, 5.0)]);

        assert_eq!(staged[0].profit_margin_pct, 0.0);
        assert_eq!(staged[0].profit_per_unit, -5.0);
    }

    #[test]
    fn test_order_calendar_decomposition() {
        let raw = RawOrder {
            order_id: "O1".to_string(),
            customer_id: "C1".to_string(),
            product_id: "P1".to_string(),
            quantity: 2,
            order_date: ts("2024-03-04T15:30:00Z"),
            status: " COMPLETED ".to_string(),
            loaded_at: ts("2024-03-05T00:00:00Z"),
            source: "csv_orders".to_string(),
        };

        let staged = dedup_orders(&[raw]);

        assert_eq!(staged[0].status, "completed");
        assert_eq!(staged[0].order_year, 2024);
        assert_eq!(staged[0].order_month, 3);
        assert_eq!(staged[0].order_weekday, "Monday");
        assert_eq!(staged[0].order_day.to_string(), "2024-03-04");
    }
}
