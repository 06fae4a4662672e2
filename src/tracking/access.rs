//! Who may subscribe to an order's status stream.
//!
//! The storefront this replaces let anyone who knew an order number listen in.
//! That stays the default (`open`) so existing clients keep working;
//! `owner-or-admin` closes the gap for deployments that identify their
//! connections.

use super::TrackingError;
use crate::clients::{CustomerClient, RecordClient};
use crate::model::{CustomerId, Order};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessPolicy {
    /// Any connection may join any order's channel, known order or not.
    #[default]
    Open,
    /// The connection's customer must own the order or be an admin.
    OwnerOrAdmin,
}

impl AccessPolicy {
    /// Decides whether `identity` may follow `order`.
    ///
    /// `order` is `None` when the reference matched nothing; only `Open`
    /// admits that.
    pub async fn authorize(
        &self,
        identity: Option<CustomerId>,
        order: Option<&Order>,
        customers: &CustomerClient,
    ) -> Result<(), TrackingError> {
        match self {
            AccessPolicy::Open => Ok(()),
            AccessPolicy::OwnerOrAdmin => {
                let Some(customer_id) = identity else {
                    return Err(TrackingError::Forbidden(
                        "identify before joining order tracking".into(),
                    ));
                };
                let Some(order) = order else {
                    return Err(TrackingError::Forbidden("no such order".into()));
                };
                if order.customer_id == customer_id {
                    return Ok(());
                }
                match customers.get(customer_id).await {
                    Ok(Some(customer)) if customer.is_admin() => Ok(()),
                    Ok(_) => Err(TrackingError::Forbidden(format!(
                        "{customer_id} may not follow {}",
                        order.order_number
                    ))),
                    Err(e) => Err(TrackingError::Lookup(e.to_string())),
                }
            }
        }
    }
}
