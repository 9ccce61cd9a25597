//! Order domain types and the record/receipt encodings.
//!
//! The key-value store holds typed attribute maps (strings and
//! numeric-as-string values), so `Order` carries an explicit encode /
//! decode pair that is total and round-trip safe: string id, exact
//! decimal string amount, RFC 3339 timestamp.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::stores::{Attribute, Record};

/// An immutable order record. Created once, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-generated opaque unique id (UUID v4)
    #[schema(example = "8d7f4b2e-3c61-4f0a-9d2e-5b8c1a7e6f00")]
    pub order_id: String,
    /// Customer email, stored as given (no validation)
    #[schema(example = "a@b.com")]
    pub customer_email: String,
    /// Exact decimal amount, serialized as a decimal string
    #[schema(value_type = String, example = "99.99")]
    pub amount: Decimal,
    /// Server-generated creation time (UTC)
    pub created_at: DateTime<Utc>,
}

/// Order-creation input. Absence of validation here mirrors the
/// service contract: the email is stored as-is.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[schema(example = "a@b.com")]
    pub customer_email: String,
    /// Accepts a JSON number or a decimal string
    #[schema(value_type = String, example = "99.99")]
    pub amount: Decimal,
}

/// Decode failure for a stored record. Surfaces as an undifferentiated
/// server error: the service assumes its own writes are well-formed.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record is missing attribute {0}")]
    MissingAttribute(&'static str),
    #[error("attribute {0} has the wrong type")]
    WrongType(&'static str),
    #[error("attribute {0} failed to parse: {1}")]
    Unparseable(&'static str, String),
}

impl Order {
    /// Create a new order from a request, generating id and timestamp.
    pub fn create(req: CreateOrderRequest) -> Self {
        Self {
            order_id: Uuid::new_v4().to_string(),
            customer_email: req.customer_email,
            amount: req.amount,
            created_at: Utc::now(),
        }
    }

    /// Encode into a key-value store record. Total: every order maps
    /// to a record, and `from_record` inverts it exactly.
    pub fn to_record(&self) -> Record {
        Record::from([
            ("OrderId".to_string(), Attribute::S(self.order_id.clone())),
            (
                "CustomerEmail".to_string(),
                Attribute::S(self.customer_email.clone()),
            ),
            ("Amount".to_string(), Attribute::N(self.amount.to_string())),
            (
                "CreatedAt".to_string(),
                Attribute::S(self.created_at.to_rfc3339()),
            ),
        ])
    }

    /// Decode a stored record back into an order.
    pub fn from_record(record: &Record) -> Result<Self, RecordError> {
        let amount_str = get_n(record, "Amount")?;
        let amount = amount_str
            .parse::<Decimal>()
            .map_err(|e| RecordError::Unparseable("Amount", e.to_string()))?;

        let created_str = get_s(record, "CreatedAt")?;
        let created_at = DateTime::parse_from_rfc3339(created_str)
            .map_err(|e| RecordError::Unparseable("CreatedAt", e.to_string()))?
            .with_timezone(&Utc);

        Ok(Self {
            order_id: get_s(record, "OrderId")?.to_string(),
            customer_email: get_s(record, "CustomerEmail")?.to_string(),
            amount,
            created_at,
        })
    }

    /// Render the fixed-format plain-text receipt for this order.
    pub fn render_receipt(&self) -> String {
        format!(
            "Order Receipt\n\n\
             Order ID: {}\n\
             Customer: {}\n\
             Amount: ${:.2}\n\
             Date: {}\n",
            self.order_id,
            self.customer_email,
            self.amount,
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }
}

/// Deterministic blob key for an order's receipt.
pub fn receipt_key(order_id: &str) -> String {
    format!("receipts/{}.txt", order_id)
}

fn get_s<'a>(record: &'a Record, name: &'static str) -> Result<&'a str, RecordError> {
    match record.get(name) {
        Some(Attribute::S(s)) => Ok(s),
        Some(_) => Err(RecordError::WrongType(name)),
        None => Err(RecordError::MissingAttribute(name)),
    }
}

fn get_n<'a>(record: &'a Record, name: &'static str) -> Result<&'a str, RecordError> {
    match record.get(name) {
        Some(Attribute::N(n)) => Ok(n),
        Some(_) => Err(RecordError::WrongType(name)),
        None => Err(RecordError::MissingAttribute(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_order() -> Order {
        Order {
            order_id: "test-order-1".to_string(),
            customer_email: "a@b.com".to_string(),
            amount: Decimal::from_str("99.99").unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_round_trip_is_exact() {
        let order = sample_order();
        let decoded = Order::from_record(&order.to_record()).unwrap();
        assert_eq!(decoded, order);
        // Amount survives as an exact decimal string
        assert_eq!(decoded.amount.to_string(), "99.99");
    }

    #[test]
    fn test_missing_attribute_fails_decode() {
        let mut record = sample_order().to_record();
        record.remove("Amount");
        let err = Order::from_record(&record).unwrap_err();
        assert!(matches!(err, RecordError::MissingAttribute("Amount")));
    }

    #[test]
    fn test_wrong_type_fails_decode() {
        let mut record = sample_order().to_record();
        record.insert("Amount".to_string(), Attribute::S("99.99".to_string()));
        let err = Order::from_record(&record).unwrap_err();
        assert!(matches!(err, RecordError::WrongType("Amount")));
    }

    #[test]
    fn test_malformed_amount_fails_decode() {
        let mut record = sample_order().to_record();
        record.insert("Amount".to_string(), Attribute::N("not-a-number".to_string()));
        assert!(Order::from_record(&record).is_err());
    }

    #[test]
    fn test_receipt_contains_order_fields() {
        let order = sample_order();
        let receipt = order.render_receipt();
        assert!(receipt.starts_with("Order Receipt"));
        assert!(receipt.contains("test-order-1"));
        assert!(receipt.contains("a@b.com"));
        assert!(receipt.contains("$99.99"));
    }

    #[test]
    fn test_receipt_amount_padded_to_two_decimals() {
        let mut order = sample_order();
        order.amount = Decimal::from_str("100").unwrap();
        assert!(order.render_receipt().contains("$100.00"));
    }

    #[test]
    fn test_receipt_key_is_deterministic() {
        assert_eq!(receipt_key("abc"), "receipts/abc.txt");
    }

    #[test]
    fn test_create_generates_unique_ids() {
        let req = CreateOrderRequest {
            customer_email: "a@b.com".to_string(),
            amount: Decimal::from_str("1.00").unwrap(),
        };
        let a = Order::create(req.clone());
        let b = Order::create(req);
        assert_ne!(a.order_id, b.order_id);
    }

    #[test]
    fn test_json_field_names_are_camel_case() {
        let json = serde_json::to_value(sample_order()).unwrap();
        assert!(json.get("orderId").is_some());
        assert!(json.get("customerEmail").is_some());
        assert_eq!(json["amount"], serde_json::json!("99.99"));
    }

    #[test]
    fn test_create_request_accepts_number_and_string_amounts() {
        let from_number: CreateOrderRequest =
            serde_json::from_str(r#"{"customerEmail":"a@b.com","amount":99.99}"#).unwrap();
        let from_string: CreateOrderRequest =
            serde_json::from_str(r#"{"customerEmail":"a@b.com","amount":"99.99"}"#).unwrap();
        assert_eq!(from_number.amount, from_string.amount);
    }
}
