use crate::framework::{CollectionClient, Filter, RecordClient, StoreError};
use crate::model::{CustomerId, Order, OrderCreate, RecordId, StatusChange};
use crate::order_actor::{OrderAction, OrderError, StatusTransition};
use crate::order_number::OrderRef;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order collection.
///
/// Checkout orchestration (customer check, stock reservation) happens in the
/// Order record's `on_create` hook; this client only shapes requests and
/// replies.
#[derive(Clone)]
pub struct OrderClient {
    inner: CollectionClient<Order>,
}

impl OrderClient {
    pub fn new(inner: CollectionClient<Order>) -> Self {
        Self { inner }
    }

    /// Places an order and returns it as stored, priced and numbered.
    #[instrument(skip(self, order), fields(customer_id = %order.customer_id, lines = order.items.len()))]
    pub async fn place_order(&self, order: OrderCreate) -> Result<Order, OrderError> {
        debug!("Sending create to collection");
        let id = self.inner.create(order).await.map_err(Self::map_error)?;
        let placed = self
            .inner
            .get(id)
            .await
            .map_err(Self::map_error)?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        info!(order_number = %placed.order_number, total = placed.total, "Order placed");
        Ok(placed)
    }

    /// Finds the order a caller-supplied identifier refers to.
    ///
    /// Accepts `ORD00042`, the legacy `#ORD00042`, or the order's record id.
    /// The stored order number is tried first; the record id only when that
    /// misses and the input has record-id shape. Empty or malformed input is
    /// [`OrderError::InvalidReference`], a well-formed miss is
    /// [`OrderError::NotFound`].
    #[instrument(skip(self))]
    pub async fn resolve(&self, reference: &str) -> Result<Order, OrderError> {
        let key = OrderRef::parse(reference)?;

        let by_number = key.clone();
        if let Some(order) = self
            .inner
            .find_one(Filter::new(move |order: &Order| by_number.is_order_number(&order.order_number)))
            .await
            .map_err(Self::map_error)?
        {
            debug!(order_number = %order.order_number, "Resolved by order number");
            return Ok(order);
        }

        if let Some(id) = key.record_id() {
            if let Some(order) = self.inner.get(id).await.map_err(Self::map_error)? {
                debug!(%id, "Resolved by record id");
                return Ok(order);
            }
        }

        Err(OrderError::NotFound(key.to_string()))
    }

    /// Every order a customer has placed, newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>, OrderError> {
        let mut orders = self
            .inner
            .find(Filter::new(move |order: &Order| order.customer_id == customer_id))
            .await
            .map_err(Self::map_error)?;
        orders.reverse();
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: RecordId,
        change: StatusChange,
    ) -> Result<StatusTransition, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, OrderAction::UpdateStatus(change))
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl RecordClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &CollectionClient<Order> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        match e {
            StoreError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .downcast_rejection::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}
