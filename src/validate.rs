use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Result, WarehouseError};
use crate::transform::round2;

/// Order statuses accepted by the orders schema
pub const ORDER_STATUSES: [&str; 4] = ["pending", "completed", "shipped", "cancelled"];

/// How the validator handles invalid rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Fail the whole batch on the first invalid row
    Strict,
    /// Drop invalid rows and report them
    Filter,
    /// Keep every row, marking validity in an `_is_valid` column
    Flag,
}

/// Which per-entity rule set to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySchema {
    Customers,
    Products,
    Orders,
}

impl EntitySchema {
    pub fn name(&self) -> &'static str {
        match self {
            EntitySchema::Customers => "customers",
            EntitySchema::Products => "products",
            EntitySchema::Orders => "orders",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "customers" => Some(EntitySchema::Customers),
            "products" => Some(EntitySchema::Products),
            "orders" => Some(EntitySchema::Orders),
            _ => None,
        }
    }
}

/// An invalid row and why it was rejected
#[derive(Debug, Clone)]
pub struct RejectedRecord {
    pub row_index: usize,
    pub reasons: Vec<String>,
    pub record: Value,
}

/// Validates extracted rows against per-entity rules before they are loaded
/// into the raw layer. Accepted rows are lightly normalized (lowercased
/// email/status, rounded price/cost). The transformation core downstream
/// never validates; this is the only guard.
pub struct RecordValidator {
    mode: ValidationMode,
    email_pattern: Regex,
}

impl RecordValidator {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            mode,
            email_pattern: Regex::new(r"^[\w.+-]+@[\w.-]+\.\w+$").expect("static email pattern"),
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validate a batch of rows. Returns the accepted rows and the rejects.
    /// In Strict mode the first invalid row fails the batch; in Flag mode
    /// nothing is dropped and every row carries an `_is_valid` marker.
    pub fn validate(
        &self,
        rows: Vec<Value>,
        schema: EntitySchema,
    ) -> Result<(Vec<Value>, Vec<RejectedRecord>)> {
        info!("Validating {} rows against {} schema", rows.len(), schema.name());

        let mut accepted = Vec::with_capacity(rows.len());
        let mut rejected = Vec::new();

        for (row_index, mut row) in rows.into_iter().enumerate() {
            let reasons = self.check_row(&row, schema);

            if reasons.is_empty() {
                normalize_row(&mut row, schema);
                if self.mode == ValidationMode::Flag {
                    flag_row(&mut row, true);
                }
                accepted.push(row);
                continue;
            }

            match self.mode {
                ValidationMode::Strict => {
                    return Err(WarehouseError::Validation(format!(
                        "row {} of {}: {}",
                        row_index,
                        schema.name(),
                        reasons.join("; ")
                    )));
                }
                ValidationMode::Filter => {
                    rejected.push(RejectedRecord {
                        row_index,
                        reasons,
                        record: row,
                    });
                }
                ValidationMode::Flag => {
                    flag_row(&mut row, false);
                    accepted.push(row);
                    rejected.push(RejectedRecord {
                        row_index,
                        reasons,
                        record: Value::Null,
                    });
                }
            }
        }

        if rejected.is_empty() {
            info!("All {} rows passed validation", accepted.len());
        } else {
            warn!(
                "Validation completed with {} rejected rows ({} accepted)",
                rejected.len(),
                accepted.len()
            );
        }

        Ok((accepted, rejected))
    }

    fn check_row(&self, row: &Value, schema: EntitySchema) -> Vec<String> {
        let mut reasons = Vec::new();
        match schema {
            EntitySchema::Customers => {
                require_text(row, "customer_id", &mut reasons);
                require_text(row, "first_name", &mut reasons);
                require_text(row, "last_name", &mut reasons);
                match text_field(row, "email") {
                    Some(email) if self.email_pattern.is_match(email.trim()) => {}
                    Some(email) => reasons.push(format!("invalid email '{}'", email.trim())),
                    None => reasons.push("missing email".to_string()),
                }
                match text_field(row, "country") {
                    Some(country) if country.trim().len() >= 2 => {}
                    Some(_) => reasons.push("country must be at least 2 characters".to_string()),
                    None => reasons.push("missing country".to_string()),
                }
            }
            EntitySchema::Products => {
                require_text(row, "product_id", &mut reasons);
                require_text(row, "product_name", &mut reasons);
                require_text(row, "category", &mut reasons);
                match number_field(row, "price") {
                    Some(price) if price > 0.0 => {}
                    Some(price) => reasons.push(format!("price must be positive, got {}", price)),
                    None => reasons.push("missing price".to_string()),
                }
                match number_field(row, "cost") {
                    Some(cost) if cost >= 0.0 => {}
                    Some(cost) => reasons.push(format!("cost must be non-negative, got {}", cost)),
                    None => reasons.push("missing cost".to_string()),
                }
            }
            EntitySchema::Orders => {
                require_text(row, "order_id", &mut reasons);
                require_text(row, "customer_id", &mut reasons);
                require_text(row, "product_id", &mut reasons);
                match row.get("quantity").and_then(|v| v.as_i64()) {
                    Some(quantity) if quantity > 0 => {}
                    Some(quantity) => {
                        reasons.push(format!("quantity must be positive, got {}", quantity))
                    }
                    None => reasons.push("missing quantity".to_string()),
                }
                require_text(row, "order_date", &mut reasons);
                match text_field(row, "status") {
                    Some(status)
                        if ORDER_STATUSES.contains(&status.trim().to_lowercase().as_str()) => {}
                    Some(status) => reasons.push(format!("unknown status '{}'", status.trim())),
                    None => reasons.push("missing status".to_string()),
                }
            }
        }
        reasons
    }
}

fn text_field<'a>(row: &'a Value, field: &str) -> Option<&'a str> {
    row.get(field).and_then(|v| v.as_str())
}

fn number_field(row: &Value, field: &str) -> Option<f64> {
    row.get(field).and_then(|v| v.as_f64())
}

fn require_text(row: &Value, field: &str, reasons: &mut Vec<String>) {
    match text_field(row, field) {
        Some(value) if !value.trim().is_empty() => {}
        _ => reasons.push(format!("missing {}", field)),
    }
}

fn flag_row(row: &mut Value, is_valid: bool) {
    if let Some(object) = row.as_object_mut() {
        object.insert("_is_valid".to_string(), Value::Bool(is_valid));
    }
}

/// Light cleanup applied to accepted rows
fn normalize_row(row: &mut Value, schema: EntitySchema) {
    let Some(object) = row.as_object_mut() else {
        return;
    };
    match schema {
        EntitySchema::Customers => {
            if let Some(email) = object.get("email").and_then(|v| v.as_str()) {
                let lowered = email.trim().to_lowercase();
                object.insert("email".to_string(), Value::String(lowered));
            }
        }
        EntitySchema::Products => {
            for field in ["price", "cost"] {
                if let Some(value) = object.get(field).and_then(|v| v.as_f64()) {
                    if let Some(number) = serde_json::Number::from_f64(round2(value)) {
                        object.insert(field.to_string(), Value::Number(number));
                    }
                }
            }
        }
        EntitySchema::Orders => {
            if let Some(status) = object.get("status").and_then(|v| v.as_str()) {
                let lowered = status.trim().to_lowercase();
                object.insert("status".to_string(), Value::String(lowered));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customer(email: &str) -> Value {
        json!({
            "customer_id": "C001",
            "first_name": "John",
            "last_name": "Doe",
            "email": email,
            "country": "US",
            "created_at": "2024-01-15T10:00:00Z"
        })
    }

    fn product(price: f64) -> Value {
        json!({
            "product_id": "P001",
            "product_name": "Test Product",
            "category": "Electronics",
            "price": price,
            "cost": 50.0
        })
    }

    fn order(status: &str, quantity: i64) -> Value {
        json!({
            "order_id": "O001",
            "customer_id": "C001",
            "product_id": "P001",
            "quantity": quantity,
            "order_date": "2024-03-04T12:00:00Z",
            "status": status
        })
    }

    #[test]
    fn test_valid_records_pass() {
        let validator = RecordValidator::new(ValidationMode::Strict);

        let (accepted, rejected) = validator
            .validate(vec![customer("john@example.com")], EntitySchema::Customers)
            .unwrap();
        assert_eq!(accepted.len(), 1);
        assert!(rejected.is_empty());

        let (accepted, _) = validator
            .validate(vec![product(99.99)], EntitySchema::Products)
            .unwrap();
        assert_eq!(accepted.len(), 1);

        let (accepted, _) = validator
            .validate(vec![order("completed", 2)], EntitySchema::Orders)
            .unwrap();
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn test_invalid_email_filtered() {
        let validator = RecordValidator::new(ValidationMode::Filter);
        let rows = vec![customer("valid@example.com"), customer("invalid-email")];

        let (accepted, rejected) = validator
            .validate(rows, EntitySchema::Customers)
            .unwrap();

        assert_eq!(accepted.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].row_index, 1);
    }

    #[test]
    fn test_email_lowercased_on_acceptance() {
        let validator = RecordValidator::new(ValidationMode::Filter);

        let (accepted, _) = validator
            .validate(vec![customer("John@Example.COM")], EntitySchema::Customers)
            .unwrap();

        assert_eq!(accepted[0]["email"], "john@example.com");
    }

    #[test]
    fn test_negative_price_rejected() {
        let validator = RecordValidator::new(ValidationMode::Filter);

        let (accepted, rejected) = validator
            .validate(vec![product(-10.0)], EntitySchema::Products)
            .unwrap();

        assert!(accepted.is_empty());
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_strict_mode_fails_the_batch() {
        let validator = RecordValidator::new(ValidationMode::Strict);

        let result = validator.validate(vec![product(-10.0)], EntitySchema::Products);

        assert!(result.is_err());
    }

    #[test]
    fn test_flag_mode_keeps_all_rows() {
        let validator = RecordValidator::new(ValidationMode::Flag);
        let rows = vec![order("completed", 2), order("teleported", 1)];

        let (accepted, rejected) = validator.validate(rows, EntitySchema::Orders).unwrap();

        assert_eq!(accepted.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert_eq!(accepted[0]["_is_valid"], true);
        assert_eq!(accepted[1]["_is_valid"], false);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let validator = RecordValidator::new(ValidationMode::Filter);

        let (accepted, rejected) = validator
            .validate(vec![order("pending", 0)], EntitySchema::Orders)
            .unwrap();

        assert!(accepted.is_empty());
        assert_eq!(rejected.len(), 1);
    }
}
