use super::Warehouse;
use crate::domain::*;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory warehouse implementation for development/testing
pub struct InMemoryWarehouse {
    raw_customers: Arc<Mutex<Vec<RawCustomer>>>,
    raw_products: Arc<Mutex<Vec<RawProduct>>>,
    raw_orders: Arc<Mutex<Vec<RawOrder>>>,
    staged_customers: Arc<Mutex<Vec<Customer>>>,
    staged_products: Arc<Mutex<Vec<Product>>>,
    staged_orders: Arc<Mutex<Vec<Order>>>,
    dim_customers: Arc<Mutex<Vec<CustomerDimension>>>,
    dim_products: Arc<Mutex<Vec<ProductDimension>>>,
    fct_orders: Arc<Mutex<Vec<FactOrder>>>,
}

impl Default for InMemoryWarehouse {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self {
            raw_customers: Arc::new(Mutex::new(Vec::new())),
            raw_products: Arc::new(Mutex::new(Vec::new())),
            raw_orders: Arc::new(Mutex::new(Vec::new())),
            staged_customers: Arc::new(Mutex::new(Vec::new())),
            staged_products: Arc::new(Mutex::new(Vec::new())),
            staged_orders: Arc::new(Mutex::new(Vec::new())),
            dim_customers: Arc::new(Mutex::new(Vec::new())),
            dim_products: Arc::new(Mutex::new(Vec::new())),
            fct_orders: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Warehouse for InMemoryWarehouse {
    async fn append_raw_customers(&self, rows: Vec<RawCustomer>) -> Result<()> {
        let mut table = self.raw_customers.lock().unwrap();
        debug!("Appending {} rows to raw customers", rows.len());
        table.extend(rows);
        Ok(())
    }

    async fn append_raw_products(&self, rows: Vec<RawProduct>) -> Result<()> {
        let mut table = self.raw_products.lock().unwrap();
        debug!("Appending {} rows to raw products", rows.len());
        table.extend(rows);
        Ok(())
    }

    async fn append_raw_orders(&self, rows: Vec<RawOrder>) -> Result<()> {
        let mut table = self.raw_orders.lock().unwrap();
        debug!("Appending {} rows to raw orders", rows.len());
        table.extend(rows);
        Ok(())
    }

    async fn raw_customers(&self) -> Result<Vec<RawCustomer>> {
        Ok(self.raw_customers.lock().unwrap().clone())
    }

    async fn raw_products(&self) -> Result<Vec<RawProduct>> {
        Ok(self.raw_products.lock().unwrap().clone())
    }

    async fn raw_orders(&self) -> Result<Vec<RawOrder>> {
        Ok(self.raw_orders.lock().unwrap().clone())
    }

    async fn replace_staged_customers(&self, rows: Vec<Customer>) -> Result<()> {
        let mut table = self.staged_customers.lock().unwrap();
        debug!("Replacing staged customers with {} rows", rows.len());
        *table = rows;
        Ok(())
    }

    async fn replace_staged_products(&self, rows: Vec<Product>) -> Result<()> {
        let mut table = self.staged_products.lock().unwrap();
        debug!("Replacing staged products with {} rows", rows.len());
        *table = rows;
        Ok(())
    }

    async fn replace_staged_orders(&self, rows: Vec<Order>) -> Result<()> {
        let mut table = self.staged_orders.lock().unwrap();
        debug!("Replacing staged orders with {} rows", rows.len());
        *table = rows;
        Ok(())
    }

    async fn staged_customers(&self) -> Result<Vec<Customer>> {
        Ok(self.staged_customers.lock().unwrap().clone())
    }

    async fn staged_products(&self) -> Result<Vec<Product>> {
        Ok(self.staged_products.lock().unwrap().clone())
    }

    async fn staged_orders(&self) -> Result<Vec<Order>> {
        Ok(self.staged_orders.lock().unwrap().clone())
    }

    async fn replace_dim_customers(&self, rows: Vec<CustomerDimension>) -> Result<()> {
        let mut table = self.dim_customers.lock().unwrap();
        debug!("Replacing dim_customers with {} rows", rows.len());
        *table = rows;
        Ok(())
    }

    async fn replace_dim_products(&self, rows: Vec<ProductDimension>) -> Result<()> {
        let mut table = self.dim_products.lock().unwrap();
        debug!("Replacing dim_products with {} rows", rows.len());
        *table = rows;
        Ok(())
    }

    async fn replace_fct_orders(&self, rows: Vec<FactOrder>) -> Result<()> {
        let mut table = self.fct_orders.lock().unwrap();
        debug!("Replacing fct_orders with {} rows", rows.len());
        *table = rows;
        Ok(())
    }

    async fn dim_customers(&self) -> Result<Vec<CustomerDimension>> {
        Ok(self.dim_customers.lock().unwrap().clone())
    }

    async fn dim_products(&self) -> Result<Vec<ProductDimension>> {
        Ok(self.dim_products.lock().unwrap().clone())
    }

    async fn fct_orders(&self) -> Result<Vec<FactOrder>> {
        Ok(self.fct_orders.lock().unwrap().clone())
    }
}
