use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentDirection {
    Inbound,
    Outbound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LogisticsStatus {
    Transit,
    Delivered,
    Exception,
}

/// An inbound or outbound shipment movement, referencing the purchase order
/// or sales order that caused it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticsEvent {
    pub id: String,
    pub direction: ShipmentDirection,
    pub reference_id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking: Option<String>,
    pub status: LogisticsStatus,
    pub items_count: i64,
}

impl LogisticsEvent {
    pub fn matches(&self, needle: &str) -> bool {
        self.id.to_lowercase().contains(needle)
            || self.reference_id.to_lowercase().contains(needle)
    }
}
