//! [`Record`] implementation for [`Order`].
//!
//! `Update` is [`Infallible`]: the generic update path cannot be called for
//! orders at all, and `on_delete` always refuses.

use super::{OrderAction, OrderContext, OrderError, StatusTransition};
use crate::clients::ProductClient;
use crate::framework::{Record, RecordClient};
use crate::model::{Order, OrderCreate, OrderItem, OrderStatus, ProductId, RecordId};
use crate::order_number::{OrderNumber, OrderNumberError};
use crate::product_actor::ProductError;
use async_trait::async_trait;
use chrono::Utc;
use std::convert::Infallible;
use tracing::{debug, info, warn};

impl From<OrderNumberError> for OrderError {
    fn from(e: OrderNumberError) -> Self {
        match e {
            OrderNumberError::ZeroSequence => OrderError::InvalidSequence(0),
            OrderNumberError::Exhausted { sequence } => OrderError::SequenceExhausted(sequence),
            OrderNumberError::EmptyReference | OrderNumberError::MalformedReference(_) => {
                OrderError::InvalidReference(e.to_string())
            }
        }
    }
}

fn reservation_error(product_id: ProductId, e: ProductError) -> OrderError {
    match e {
        ProductError::NotFound(_) => OrderError::InvalidProduct(product_id.to_string()),
        ProductError::InsufficientStock { requested, available } => OrderError::InsufficientStock {
            product: product_id.to_string(),
            requested,
            available,
        },
        ProductError::InvalidQuantity(_) => OrderError::InvalidQuantity(product_id.to_string()),
        other => OrderError::ActorCommunicationError(other.to_string()),
    }
}

/// Hands reserved units back, newest first. Failures are logged, not raised.
async fn release_all(products: &ProductClient, lines: &[(ProductId, u32)]) {
    for (product_id, quantity) in lines.iter().rev() {
        if let Err(e) = products.release_stock(*product_id, *quantity).await {
            warn!(%product_id, quantity, error = %e, "Stock release failed");
        }
    }
}

#[async_trait]
impl Record for Order {
    type Id = RecordId;
    type Create = OrderCreate;
    type Update = Infallible;
    type Action = OrderAction;
    type ActionResult = StatusTransition;
    type Context = OrderContext;
    type Error = OrderError;

    /// Validates the cart and assigns the order number.
    ///
    /// Lines are unpriced until `on_create` has reserved them.
    fn from_create_params(
        id: RecordId,
        sequence: u32,
        params: OrderCreate,
        ctx: &OrderContext,
    ) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if let Some(line) = params.items.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::InvalidQuantity(line.product_id.to_string()));
        }
        let order_number = OrderNumber::format(sequence, ctx.overflow)?;

        let now = Utc::now();
        let items = params
            .items
            .into_iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                name: String::new(),
                quantity: line.quantity,
                unit_price: 0,
            })
            .collect();

        Ok(Self {
            id,
            sequence,
            order_number,
            customer_id: params.customer_id,
            items,
            subtotal: 0,
            shipping_fee: params.shipping_fee,
            total: 0,
            address_id: params.address_id,
            payment_method: params.payment_method,
            status: OrderStatus::Pending,
            tracking_number: None,
            estimated_delivery: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Checks the customer, then reserves and prices every line.
    ///
    /// If any line fails, the lines already reserved are released before the
    /// error is returned, so a rejected checkout leaves stock untouched.
    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        match ctx.customers.get(self.customer_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(OrderError::InvalidCustomer(self.customer_id.to_string())),
            Err(e) => return Err(OrderError::ActorCommunicationError(e.to_string())),
        }

        let mut reserved = Vec::with_capacity(self.items.len());
        for item in self.items.iter_mut() {
            match ctx.products.reserve_stock(item.product_id, item.quantity).await {
                Ok(reservation) => {
                    debug!(product_id = %item.product_id, remaining = reservation.remaining, "Reserved");
                    item.name = reservation.name;
                    item.unit_price = reservation.unit_price;
                    reserved.push((item.product_id, item.quantity));
                }
                Err(e) => {
                    let product_id = item.product_id;
                    release_all(&ctx.products, &reserved).await;
                    return Err(reservation_error(product_id, e));
                }
            }
        }

        self.reprice();
        info!(order_number = %self.order_number, total = self.total, "Checkout complete");
        Ok(())
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &OrderContext) -> Result<(), OrderError> {
        match update {}
    }

    async fn on_delete(&self, _ctx: &OrderContext) -> Result<(), OrderError> {
        Err(OrderError::DeletionForbidden)
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<StatusTransition, OrderError> {
        match action {
            OrderAction::UpdateStatus(change) => {
                let previous = self.status;
                if !previous.can_transition_to(change.status) {
                    return Err(OrderError::InvalidTransition {
                        from: previous,
                        to: change.status,
                    });
                }

                self.status = change.status;
                if change.tracking_number.is_some() {
                    self.tracking_number = change.tracking_number;
                }
                if change.estimated_delivery.is_some() {
                    self.estimated_delivery = change.estimated_delivery;
                }
                self.updated_at = Utc::now();

                if self.status == OrderStatus::Cancelled {
                    let lines: Vec<_> = self
                        .items
                        .iter()
                        .map(|item| (item.product_id, item.quantity))
                        .collect();
                    release_all(&ctx.products, &lines).await;
                }

                Ok(StatusTransition {
                    previous,
                    order: self.clone(),
                })
            }
        }
    }
}
