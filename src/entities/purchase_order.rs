use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PoStatus {
    Draft,
    Sent,
    Confirmed,
    Shipped,
    Received,
    Partial,
    Cancelled,
}

/// One line of a purchase order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub sku: String,
    pub description: String,
    pub qty: i64,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// A purchase order towards a supplier. Supplier name is denormalized for
/// display speed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: String,
    pub date: NaiveDate,
    pub supplier_id: String,
    pub supplier_name: String,
    pub status: PoStatus,
    pub items: Vec<PurchaseOrderLine>,
    pub total_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PurchaseOrder {
    pub fn matches(&self, needle: &str) -> bool {
        self.id.to_lowercase().contains(needle)
            || self.supplier_name.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&PoStatus::Received).unwrap();
        assert_eq!(json, r#""RECEIVED""#);
    }
}
