use tracing::debug;

use crate::domain::{EnrichedOrder, FactOrder, OrderValueTier};

/// Value tier thresholds, evaluated top-down with inclusive lower bounds.
/// An order without a resolved total falls through to Low.
pub fn classify_value_tier(order_total: Option<f64>) -> OrderValueTier {
    match order_total {
        Some(total) if total >= 300.0 => OrderValueTier::High,
        Some(total) if total >= 100.0 => OrderValueTier::Medium,
        _ => OrderValueTier::Low,
    }
}

/// Flatten enriched orders into fact rows. Row-wise only: no grouping, no
/// filtering; output cardinality equals input cardinality.
pub fn project_facts(enriched: &[EnrichedOrder]) -> Vec<FactOrder> {
    let facts: Vec<FactOrder> = enriched
        .iter()
        .map(|order| FactOrder {
            order_id: order.order_id.clone(),
            customer_id: order.customer_id.clone(),
            product_id: order.product_id.clone(),
            customer_name: order.customer.as_ref().map(|c| c.full_name.clone()),
            customer_country: order.customer.as_ref().map(|c| c.country.clone()),
            product_name: order.product.as_ref().map(|p| p.product_name.clone()),
            category: order.product.as_ref().map(|p| p.category.clone()),
            unit_price: order.product.as_ref().map(|p| p.price),
            quantity: order.quantity,
            status: order.status.clone(),
            order_date: order.order_date,
            order_day: order.order_day,
            order_year: order.order_year,
            order_month: order.order_month,
            order_weekday: order.order_weekday.clone(),
            order_total: order.order_total,
            order_cost: order.order_cost,
            order_profit: order.order_profit,
            is_completed: order.status == "completed",
            order_value_tier: classify_value_tier(order.order_total),
        })
        .collect();

    debug!("Projected {} fact rows", facts.len());
    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerSnapshot, ProductSnapshot};
    use chrono::{DateTime, Datelike, Utc};

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn enriched(id: &str, total: Option<f64>, status: &str) -> EnrichedOrder {
        let order_date = ts("2024-03-04T12:00:00Z");
        EnrichedOrder {
            order_id: id.to_string(),
            customer_id: "C1".to_string(),
            product_id: "P1".to_string(),
            quantity: 1,
            status: status.to_string(),
            order_date,
            order_day: order_date.date_naive(),
            order_year: order_date.year(),
            order_month: order_date.month(),
            order_weekday: order_date.format("%A").to_string(),
            customer: Some(CustomerSnapshot {
                full_name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                country: "UK".to_string(),
            }),
            product: total.map(|t| ProductSnapshot {
                product_name: "Widget".to_string(),
                category: "Gadgets".to_string(),
                price: t,
                cost: t / 2.0,
            }),
            order_total: total,
            order_cost: total.map(|t| t / 2.0),
            order_profit: total.map(|t| t / 2.0),
        }
    }

    #[test]
    fn test_value_tier_boundaries() {
        assert_eq!(classify_value_tier(Some(300.0)), OrderValueTier::High);
        assert_eq!(classify_value_tier(Some(299.99)), OrderValueTier::Medium);
        assert_eq!(classify_value_tier(Some(100.0)), OrderValueTier::Medium);
        assert_eq!(classify_value_tier(Some(99.99)), OrderValueTier::Low);
        assert_eq!(classify_value_tier(None), OrderValueTier::Low);
    }

    #[test]
    fn test_is_completed_flag() {
        let facts = project_facts(&[
            enriched("O1", Some(50.0), "completed"),
            enriched("O2", Some(50.0), "pending"),
        ]);

        assert!(facts[0].is_completed);
        assert!(!facts[1].is_completed);
    }

    #[test]
    fn test_orphaned_order_keeps_null_fields() {
        let facts = project_facts(&[enriched("O1", None, "completed")]);

        assert_eq!(facts.len(), 1);
        let row = &facts[0];
        assert_eq!(row.product_name, None);
        assert_eq!(row.order_total, None);
        assert_eq!(row.order_profit, None);
        assert_eq!(row.order_value_tier, OrderValueTier::Low);
        assert!(row.is_completed);
    }

    #[test]
    fn test_cardinality_preserved() {
        let rows: Vec<EnrichedOrder> = (0..25)
            .map(|i| enriched(&format!("O{}", i), Some(10.0), "pending"))
            .collect();

        assert_eq!(project_facts(&rows).len(), rows.len());
    }
}
