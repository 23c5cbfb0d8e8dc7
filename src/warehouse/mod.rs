use crate::domain::{
    Customer, CustomerDimension, FactOrder, Order, Product, ProductDimension, RawCustomer,
    RawOrder, RawProduct,
};
use crate::error::Result;
use async_trait::async_trait;

pub mod in_memory;

pub use in_memory::InMemoryWarehouse;

/// Storage boundary for the warehouse layers. Raw tables are append-only;
/// staged and mart tables are replaced wholesale by each transformation
/// run. Readers return full snapshots.
#[async_trait]
pub trait Warehouse: Send + Sync {
    // Raw layer (append-only)
    async fn append_raw_customers(&self, rows: Vec<RawCustomer>) -> Result<()>;
    async fn append_raw_products(&self, rows: Vec<RawProduct>) -> Result<()>;
    async fn append_raw_orders(&self, rows: Vec<RawOrder>) -> Result<()>;
    async fn raw_customers(&self) -> Result<Vec<RawCustomer>>;
    async fn raw_products(&self) -> Result<Vec<RawProduct>>;
    async fn raw_orders(&self) -> Result<Vec<RawOrder>>;

    // Staging layer (full replacement per run)
    async fn replace_staged_customers(&self, rows: Vec<Customer>) -> Result<()>;
    async fn replace_staged_products(&self, rows: Vec<Product>) -> Result<()>;
    async fn replace_staged_orders(&self, rows: Vec<Order>) -> Result<()>;
    async fn staged_customers(&self) -> Result<Vec<Customer>>;
    async fn staged_products(&self) -> Result<Vec<Product>>;
    async fn staged_orders(&self) -> Result<Vec<Order>>;

    // Mart layer (full replacement per run)
    async fn replace_dim_customers(&self, rows: Vec<CustomerDimension>) -> Result<()>;
    async fn replace_dim_products(&self, rows: Vec<ProductDimension>) -> Result<()>;
    async fn replace_fct_orders(&self, rows: Vec<FactOrder>) -> Result<()>;
    async fn dim_customers(&self) -> Result<Vec<CustomerDimension>>;
    async fn dim_products(&self) -> Result<Vec<ProductDimension>>;
    async fn fct_orders(&self) -> Result<Vec<FactOrder>>;
}
