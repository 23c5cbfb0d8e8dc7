use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{Customer, CustomerSnapshot, EnrichedOrder, Order, Product, ProductSnapshot};

use super::round2;

/// Left join deduplicated orders against deduplicated customers and
/// products, computing the per-order monetary fields. An order whose
/// references do not resolve is kept with `None` snapshots and `None`
/// monetary fields. Output cardinality always equals input cardinality.
pub fn enrich_orders(
    orders: &[Order],
    customers: &[Customer],
    products: &[Product],
) -> Vec<EnrichedOrder> {
    let customers_by_id: HashMap<&str, &Customer> = customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c))
        .collect();
    let products_by_id: HashMap<&str, &Product> =
        products.iter().map(|p| (p.product_id.as_str(), p)).collect();

    let mut unresolved = 0usize;
    let enriched: Vec<EnrichedOrder> = orders
        .iter()
        .map(|order| {
            let customer = customers_by_id
                .get(order.customer_id.as_str())
                .map(|c| CustomerSnapshot {
                    full_name: c.full_name.clone(),
                    email: c.email.clone(),
                    country: c.country.clone(),
                });
            let product = products_by_id
                .get(order.product_id.as_str())
                .map(|p| ProductSnapshot {
                    product_name: p.product_name.clone(),
                    category: p.category.clone(),
                    price: p.price,
                    cost: p.cost,
                });

            if customer.is_none() || product.is_none() {
                unresolved += 1;
            }

            let (order_total, order_cost, order_profit) = match &product {
                Some(p) => {
                    let total = round2(p.price * order.quantity as f64);
                    let cost = round2(p.cost * order.quantity as f64);
                    (Some(total), Some(cost), Some(round2(total - cost)))
                }
                None => (None, None, None),
            };

            EnrichedOrder {
                order_id: order.order_id.clone(),
                customer_id: order.customer_id.clone(),
                product_id: order.product_id.clone(),
                quantity: order.quantity,
                status: order.status.clone(),
                order_date: order.order_date,
                order_day: order.order_day,
                order_year: order.order_year,
                order_month: order.order_month,
                order_weekday: order.order_weekday.clone(),
                customer,
                product,
                order_total,
                order_cost,
                order_profit,
            }
        })
        .collect();

    if unresolved > 0 {
        warn!(
            "{} of {} orders reference a missing customer or product",
            unresolved,
            orders.len()
        );
    }
    debug!("Enriched {} orders", enriched.len());
    enriched
}
