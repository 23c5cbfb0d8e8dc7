use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ApiSourceConfig;
use crate::error::Result;

use super::{stamp_records, Extractor};

/// Extractor for REST API sources with optional envelope unwrapping and
/// cursor-style pagination
pub struct ApiExtractor {
    base_url: String,
    endpoint: String,
    source_name: String,
    data_key: Option<String>,
    pagination_key: Option<String>,
    rate_limit_delay: Duration,
    client: reqwest::Client,
}

impl ApiExtractor {
    pub fn new(
        base_url: impl Into<String>,
        endpoint: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint: endpoint.into(),
            source_name: source_name.into(),
            data_key: None,
            pagination_key: None,
            rate_limit_delay: Duration::from_millis(500),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ApiSourceConfig) -> Self {
        let mut extractor = Self::new(&config.base_url, &config.endpoint, &config.name);
        extractor.data_key = config.data_key.clone();
        extractor.pagination_key = config.pagination_key.clone();
        extractor.rate_limit_delay = Duration::from_millis(config.rate_limit_delay_ms);
        extractor
    }

    pub fn with_data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = Some(key.into());
        self
    }

    pub fn with_pagination_key(mut self, key: impl Into<String>) -> Self {
        self.pagination_key = Some(key.into());
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }

    /// Pull the record array out of a response body
    fn unwrap_records(&self, response: &Value) -> Vec<Value> {
        match &self.data_key {
            Some(key) => response
                .get(key)
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default(),
            None => match response {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            },
        }
    }

    fn next_page_url(&self, response: &Value) -> Option<String> {
        let key = self.pagination_key.as_ref()?;
        response.get(key)?.as_str().map(|s| s.to_string())
    }
}

#[async_trait]
impl Extractor for ApiExtractor {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    async fn extract(&self) -> Result<Vec<Value>> {
        let mut url = self.url();
        info!("Extracting data from {}", url);

        let mut records = Vec::new();
        let mut page = 1;
        loop {
            debug!("Fetching page {}", page);
            let response: Value = self
                .client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            records.extend(self.unwrap_records(&response));

            match self.next_page_url(&response) {
                Some(next) => {
                    url = next;
                    page += 1;
                    tokio::time::sleep(self.rate_limit_delay).await;
                }
                None => break,
            }
        }

        stamp_records(&mut records, &self.source_name, Utc::now());
        info!("Extracted {} records from API", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_records_with_data_key() {
        let extractor =
            ApiExtractor::new("https://api.example.com", "/orders", "api_orders")
                .with_data_key("results");

        let response = json!({"results": [{"order_id": "O1"}, {"order_id": "O2"}]});
        assert_eq!(extractor.unwrap_records(&response).len(), 2);

        let empty = json!({"unrelated": true});
        assert!(extractor.unwrap_records(&empty).is_empty());
    }

    #[test]
    fn test_unwrap_records_bare_array() {
        let extractor = ApiExtractor::new("https://api.example.com", "/orders", "api_orders");

        let response = json!([{"order_id": "O1"}]);
        assert_eq!(extractor.unwrap_records(&response).len(), 1);
    }

    #[test]
    fn test_next_page_url() {
        let extractor = ApiExtractor::new("https://api.example.com", "/orders", "api_orders")
            .with_pagination_key("next");

        let response = json!({"next": "https://api.example.com/orders?page=2"});
        assert_eq!(
            extractor.next_page_url(&response).as_deref(),
            Some("https://api.example.com/orders?page=2")
        );
        assert_eq!(extractor.next_page_url(&json!({})), None);
    }

    #[test]
    fn test_url_joins_segments() {
        let extractor = ApiExtractor::new("https://api.example.com/", "/v1/orders", "api_orders");
        assert_eq!(extractor.url(), "https://api.example.com/v1/orders");
    }
}
