//! # Admin Desk
//!
//! Status changes made by store staff. A successful transition is pushed to
//! everyone following the order; if that push fails the change still stands.

use crate::clients::{CustomerClient, OrderClient, RecordClient};
use crate::model::{CustomerId, Order, StatusChange};
use crate::order_actor::OrderError;
use crate::tracking::{ChannelName, HubClient, StatusUpdate};
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct AdminDesk {
    customers: CustomerClient,
    orders: OrderClient,
    hub: HubClient,
}

impl AdminDesk {
    pub fn new(customers: CustomerClient, orders: OrderClient, hub: HubClient) -> Self {
        Self { customers, orders, hub }
    }

    /// Moves an order to a new status on behalf of `admin` and notifies its
    /// subscribers.
    ///
    /// `reference` takes any form [`OrderClient::resolve`] accepts.
    #[instrument(skip(self, change), fields(status = %change.status))]
    pub async fn update_order_status(
        &self,
        admin: CustomerId,
        reference: &str,
        change: StatusChange,
    ) -> Result<Order, OrderError> {
        match self.customers.get(admin).await {
            Ok(Some(customer)) if customer.is_admin() => {}
            Ok(_) => return Err(OrderError::Forbidden(format!("{admin} is not an admin"))),
            Err(e) => return Err(OrderError::ActorCommunicationError(e.to_string())),
        }

        let order = self.orders.resolve(reference).await?;
        let transition = self.orders.update_status(order.id, change).await?;
        let order = transition.order;
        info!(
            order_number = %order.order_number,
            from = %transition.previous,
            to = %order.status,
            "Status changed"
        );

        let channel = ChannelName::from(&order.order_number);
        match self.hub.publish(channel, StatusUpdate::from(&order)).await {
            Ok(delivered) => info!(order_number = %order.order_number, delivered, "Subscribers notified"),
            Err(e) => warn!(order_number = %order.order_number, error = %e, "Status notification failed"),
        }

        Ok(order)
    }
}
