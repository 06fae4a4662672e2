use super::access::AccessPolicy;
use super::client::{HubClient, TrackingConnection};
use super::hub::ChannelName;
use super::TrackingError;
use crate::clients::{CustomerClient, OrderClient, RecordClient};
use crate::model::CustomerId;
use crate::order_actor::OrderError;
use crate::order_number::OrderRef;
use tracing::{info, instrument};

/// The tracking service handed to every connection handler.
///
/// Turns caller-supplied order identifiers into channel names, applies the
/// [`AccessPolicy`] and forwards to the hub. Policy checks run here, on the
/// caller's task, so the hub itself never waits on another actor.
#[derive(Clone)]
pub struct Tracker {
    hub: HubClient,
    orders: OrderClient,
    customers: CustomerClient,
    access: AccessPolicy,
    outbox_capacity: usize,
}

impl Tracker {
    pub fn new(
        hub: HubClient,
        orders: OrderClient,
        customers: CustomerClient,
        access: AccessPolicy,
        outbox_capacity: usize,
    ) -> Self {
        Self { hub, orders, customers, access, outbox_capacity }
    }

    pub async fn connect(&self) -> Result<TrackingConnection, TrackingError> {
        self.hub.connect(self.outbox_capacity).await
    }

    /// Records who is on the other end of `connection`.
    ///
    /// Only checks that the customer exists; proving the caller *is* that
    /// customer belongs to the authentication layer in front of the transport.
    #[instrument(skip(self, connection), fields(connection_id = connection.id()))]
    pub async fn identify(
        &self,
        connection: &mut TrackingConnection,
        customer_id: CustomerId,
    ) -> Result<(), TrackingError> {
        match self.customers.get(customer_id).await {
            Ok(Some(_)) => {
                connection.set_identity(customer_id);
                info!("Identified");
                Ok(())
            }
            Ok(None) => Err(TrackingError::UnknownCustomer(customer_id.to_string())),
            Err(e) => Err(TrackingError::Lookup(e.to_string())),
        }
    }

    /// Subscribes `connection` to the order's channel.
    ///
    /// A reference that resolves to a stored order joins that order's
    /// canonical channel, so `#ORD00007` and the record id both land on
    /// `order-ORD00007`.
    #[instrument(skip(self, connection), fields(connection_id = connection.id()))]
    pub async fn join(
        &self,
        connection: &TrackingConnection,
        reference: &str,
    ) -> Result<ChannelName, TrackingError> {
        let key = parse_reference(reference)?;
        let channel = match self.orders.resolve(key.as_str()).await {
            Ok(order) => {
                self.access
                    .authorize(connection.identity(), Some(&order), &self.customers)
                    .await?;
                ChannelName::from(&order.order_number)
            }
            Err(OrderError::NotFound(_)) => {
                self.access
                    .authorize(connection.identity(), None, &self.customers)
                    .await?;
                ChannelName::for_order(&key)
            }
            Err(e) => return Err(TrackingError::Lookup(e.to_string())),
        };
        self.hub.subscribe(connection.id(), channel.clone()).await?;
        Ok(channel)
    }

    /// Leaves the order's channel. Not being subscribed is fine.
    #[instrument(skip(self, connection), fields(connection_id = connection.id()))]
    pub async fn leave(
        &self,
        connection: &TrackingConnection,
        reference: &str,
    ) -> Result<ChannelName, TrackingError> {
        let key = parse_reference(reference)?;
        let channel = match self.orders.resolve(key.as_str()).await {
            Ok(order) => ChannelName::from(&order.order_number),
            Err(OrderError::NotFound(_)) => ChannelName::for_order(&key),
            Err(e) => return Err(TrackingError::Lookup(e.to_string())),
        };
        self.hub.unsubscribe(connection.id(), channel.clone()).await?;
        Ok(channel)
    }
}

fn parse_reference(reference: &str) -> Result<OrderRef, TrackingError> {
    OrderRef::parse(reference).map_err(|e| TrackingError::InvalidOrderReference(e.to_string()))
}
