//! # Wire Events
//!
//! Every message on the tracking transport is one JSON object:
//!
//! ```text
//! {"event": "join-order-tracking", "data": {"orderId": "ORD00007"}}
//! ```
//!
//! Inbound and outbound kinds are closed enums, so the gateway's dispatch is a
//! plain exhaustive `match`.

use crate::model::{CustomerId, Order, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The payload pushed to subscribers when an order changes status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Display identifier, e.g. `ORD00007`.
    pub order_id: String,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
}

impl From<&Order> for StatusUpdate {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_number.to_string(),
            status: order.status,
            tracking_number: order.tracking_number.clone(),
            estimated_delivery: order.estimated_delivery,
        }
    }
}

/// Events a client sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    Identify { customer_id: CustomerId },
    #[serde(rename_all = "camelCase")]
    JoinOrderTracking { order_id: String },
    #[serde(rename_all = "camelCase")]
    LeaveOrderTracking { order_id: String },
    /// Requires an identified administrator.
    #[serde(rename_all = "camelCase")]
    AdminStatusUpdate {
        order_id: String,
        status: OrderStatus,
        #[serde(default)]
        tracking_number: Option<String>,
        #[serde(default)]
        estimated_delivery: Option<DateTime<Utc>>,
    },
}

/// Events the server sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    Identified { customer_id: CustomerId },
    #[serde(rename_all = "camelCase")]
    Joined { order_id: String, channel: String },
    #[serde(rename_all = "camelCase")]
    Left { order_id: String, channel: String },
    OrderStatusUpdated(StatusUpdate),
    Error { message: String },
}

impl ServerEvent {
    pub fn error(e: impl std::fmt::Display) -> Self {
        ServerEvent::Error { message: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_event_shape() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "join-order-tracking",
            "data": { "orderId": "#ORD00007" }
        }))
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinOrderTracking { order_id: "#ORD00007".into() }
        );
    }

    #[test]
    fn test_admin_update_optional_fields_default() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "admin-status-update",
            "data": { "orderId": "ORD00001", "status": "confirmed" }
        }))
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::AdminStatusUpdate {
                order_id: "ORD00001".into(),
                status: OrderStatus::Confirmed,
                tracking_number: None,
                estimated_delivery: None,
            }
        );
    }

    #[test]
    fn test_status_update_omits_absent_fields() {
        let event = ServerEvent::OrderStatusUpdated(StatusUpdate {
            order_id: "ORD00007".into(),
            status: OrderStatus::Shipped,
            tracking_number: Some("DTDC123".into()),
            estimated_delivery: None,
        });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "order-status-updated",
                "data": { "orderId": "ORD00007", "status": "shipped", "trackingNumber": "DTDC123" }
            })
        );
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let parsed = serde_json::from_value::<ClientEvent>(json!({
            "event": "subscribe-everything",
            "data": {}
        }));
        assert!(parsed.is_err());
    }
}
