use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};

use ecom_warehouse::domain::{OrderValueTier, RawCustomer, RawOrder, RawProduct, SalesTier};
use ecom_warehouse::pipeline::TransformPipeline;
use ecom_warehouse::warehouse::{InMemoryWarehouse, Warehouse};

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn raw_customer(id: &str, country: &str, loaded_at: &str) -> RawCustomer {
    RawCustomer {
        customer_id: id.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        country: country.to_string(),
        created_at: Some(ts("2024-01-01T00:00:00Z")),
        loaded_at: ts(loaded_at),
        source: "csv_customers".to_string(),
    }
}

fn raw_product(id: &str, price: f64, cost: f64) -> RawProduct {
    RawProduct {
        product_id: id.to_string(),
        product_name: format!("Product {}", id),
        category: "Gadgets".to_string(),
        price,
        cost,
        loaded_at: ts("2024-03-01T00:00:00Z"),
        source: "csv_products".to_string(),
    }
}

fn raw_order(
    id: &str,
    customer_id: &str,
    product_id: &str,
    quantity: i64,
    status: &str,
    order_date: &str,
) -> RawOrder {
    RawOrder {
        order_id: id.to_string(),
        customer_id: customer_id.to_string(),
        product_id: product_id.to_string(),
        quantity,
        order_date: ts(order_date),
        status: status.to_string(),
        loaded_at: ts("2024-03-10T00:00:00Z"),
        source: "csv_orders".to_string(),
    }
}

async fn seed_warehouse(warehouse: &dyn Warehouse) -> Result<()> {
    warehouse
        .append_raw_customers(vec![
            raw_customer("C1", "US", "2024-03-01T00:00:00Z"),
            raw_customer("C1", "DE", "2024-03-02T00:00:00Z"),
            raw_customer("C2", "FR", "2024-03-01T00:00:00Z"),
        ])
        .await?;
    warehouse
        .append_raw_products(vec![
            raw_product("P1", 50.0, 20.0),
            raw_product("P2", 250.0, 100.0),
        ])
        .await?;
    warehouse
        .append_raw_orders(vec![
            raw_order("O1", "C1", "P1", 2, "completed", "2024-03-04T12:00:00Z"),
            raw_order("O2", "C1", "P99", 1, "pending", "2024-03-05T12:00:00Z"),
            raw_order("O3", "C2", "P1", 1, "completed", "2024-03-06T12:00:00Z"),
        ])
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_full_transformation_run() -> Result<()> {
    let warehouse = Arc::new(InMemoryWarehouse::new());
    seed_warehouse(warehouse.as_ref()).await?;
    let as_of = ts("2024-04-01T00:00:00Z");

    let summary = TransformPipeline::run(warehouse.clone(), as_of).await?;

    // Dedup collapses C1's two raw versions
    assert_eq!(summary.staged_customers, 2);
    assert_eq!(summary.staged_orders, 3);

    // Left joins preserve cardinality everywhere
    assert_eq!(summary.fct_orders, summary.staged_orders);
    assert_eq!(summary.dim_customers, summary.staged_customers);
    assert_eq!(summary.dim_products, summary.staged_products);

    // The surviving C1 row is the most recently loaded one
    let dims = warehouse.dim_customers().await?;
    let c1 = dims.iter().find(|d| d.customer_id == "C1").unwrap();
    assert_eq!(c1.country, "DE");
    assert_eq!(c1.total_orders, 2);
    assert_eq!(c1.completed_orders, 1);
    assert_eq!(c1.completion_rate, 50.0);
    // O2 references a missing product, so only O1 contributes value
    assert_eq!(c1.lifetime_value, 100.0);
    Ok(())
}

#[tokio::test]
async fn test_orphaned_order_survives_to_fact() -> Result<()> {
    let warehouse = Arc::new(InMemoryWarehouse::new());
    seed_warehouse(warehouse.as_ref()).await?;

    TransformPipeline::run(warehouse.clone(), ts("2024-04-01T00:00:00Z")).await?;

    let facts = warehouse.fct_orders().await?;
    let orphan = facts.iter().find(|f| f.order_id == "O2").unwrap();
    assert_eq!(orphan.product_name, None);
    assert_eq!(orphan.order_total, None);
    assert_eq!(orphan.order_profit, None);
    assert_eq!(orphan.order_value_tier, OrderValueTier::Low);
    Ok(())
}

#[tokio::test]
async fn test_unsold_product_appears_in_dimension() -> Result<()> {
    let warehouse = Arc::new(InMemoryWarehouse::new());
    seed_warehouse(warehouse.as_ref()).await?;

    TransformPipeline::run(warehouse.clone(), ts("2024-04-01T00:00:00Z")).await?;

    let dims = warehouse.dim_products().await?;
    let p2 = dims.iter().find(|d| d.product_id == "P2").unwrap();
    assert_eq!(p2.total_quantity_sold, 0);
    assert_eq!(p2.sales_tier, SalesTier::NoSales);
    assert_eq!(p2.first_order_date, None);
    Ok(())
}

#[tokio::test]
async fn test_rerun_over_unchanged_raw_data_is_idempotent() -> Result<()> {
    let warehouse = Arc::new(InMemoryWarehouse::new());
    seed_warehouse(warehouse.as_ref()).await?;
    let as_of = ts("2024-04-01T00:00:00Z");

    TransformPipeline::run(warehouse.clone(), as_of).await?;
    let first_dims = warehouse.dim_customers().await?;
    let first_products = warehouse.dim_products().await?;
    let first_facts = warehouse.fct_orders().await?;

    TransformPipeline::run(warehouse.clone(), as_of).await?;
    assert_eq!(warehouse.dim_customers().await?, first_dims);
    assert_eq!(warehouse.dim_products().await?, first_products);
    assert_eq!(warehouse.fct_orders().await?, first_facts);
    Ok(())
}

#[tokio::test]
async fn test_completion_rate_stays_in_range() -> Result<()> {
    let warehouse = Arc::new(InMemoryWarehouse::new());
    seed_warehouse(warehouse.as_ref()).await?;

    TransformPipeline::run(warehouse.clone(), ts("2024-04-01T00:00:00Z")).await?;

    for dim in warehouse.dim_customers().await? {
        assert!(dim.completion_rate >= 0.0 && dim.completion_rate <= 100.0);
        assert!(dim.lifetime_value >= 0.0);
    }
    Ok(())
}
