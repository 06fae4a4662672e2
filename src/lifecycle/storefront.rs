use crate::admin::AdminDesk;
use crate::clients::{CustomerClient, OrderClient, ProductClient};
use crate::config::Config;
use crate::order_actor::OrderContext;
use crate::tracking::{Dispatcher, HubClient, Tracker, TrackingHub};
use tracing::{error, info};

/// The running storefront: every collection actor plus the one tracking hub.
///
/// `Storefront` is responsible for:
/// - **Lifecycle Management**: starting and stopping all actors
/// - **Dependency Wiring**: the Order collection gets the Customer and
///   Product clients at `run()`; the tracker and admin desk share the hub
///
/// The hub is created here exactly once and handed out as a cloneable
/// [`HubClient`]; nothing else can create channel state.
///
/// # Example
///
/// ```ignore
/// let storefront = Storefront::new(&Config::default());
/// let order = storefront.orders.place_order(cart).await?;
/// storefront.admin.update_order_status(admin_id, order.order_number.as_str(), change).await?;
/// storefront.shutdown().await?;
/// ```
pub struct Storefront {
    pub customers: CustomerClient,
    pub products: ProductClient,
    pub orders: OrderClient,
    pub hub: HubClient,
    pub tracker: Tracker,
    pub admin: AdminDesk,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Storefront {
    /// Creates and starts every actor. Must be called inside a Tokio runtime.
    pub fn new(config: &Config) -> Self {
        let buffer_size = config.store.buffer_size;

        // 1. Create actors (no dependencies yet)
        let (customer_actor, customers) = crate::customer_actor::new(buffer_size);
        let (product_actor, products) = crate::product_actor::new(buffer_size);
        let (order_actor, orders) = crate::order_actor::new(buffer_size);
        let (hub, hub_client) = TrackingHub::new(buffer_size);

        // 2. Start actors with injected context
        let customer_handle = tokio::spawn(customer_actor.run(()));
        let product_handle = tokio::spawn(product_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            customers: customers.clone(),
            products: products.clone(),
            overflow: config.order_numbers.overflow,
        }));
        let hub_handle = tokio::spawn(hub.run());

        // 3. Services over the running actors
        let tracker = Tracker::new(
            hub_client.clone(),
            orders.clone(),
            customers.clone(),
            config.tracking.access,
            config.tracking.outbox_capacity,
        );
        let admin = AdminDesk::new(customers.clone(), orders.clone(), hub_client.clone());

        info!(
            access = ?config.tracking.access,
            overflow = ?config.order_numbers.overflow,
            "Storefront started"
        );

        Self {
            customers,
            products,
            orders,
            hub: hub_client,
            tracker,
            admin,
            handles: vec![customer_handle, product_handle, order_handle, hub_handle],
        }
    }

    /// The event router for transport sessions.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.tracker.clone(), self.admin.clone())
    }

    /// Drops every client held here and waits for the actors to stop.
    ///
    /// Clones handed out elsewhere (gateway sessions, open tracking
    /// connections) keep their actor alive; close those first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down storefront...");

        let Self {
            customers,
            products,
            orders,
            hub,
            tracker,
            admin,
            handles,
        } = self;
        drop((customers, products, orders, hub, tracker, admin));

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}
