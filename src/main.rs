//! Demo storefront: seeds a catalog, places an order, then serves order
//! tracking over TCP until Ctrl-C.

use tracing::{error, info, Instrument};
use uthraa_orders::config::Config;
use uthraa_orders::lifecycle::{setup_tracing, Storefront};
use uthraa_orders::model::{
    CustomerCreate, LineRequest, OrderCreate, PaymentMethod, ProductCreate, Role,
};
use uthraa_orders::tracking::Gateway;

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = Config::load().map_err(|e| e.to_string())?;
    setup_tracing(&config.logging.filter);

    info!("Starting Uthraa storefront");
    let storefront = Storefront::new(&config);

    let span = tracing::info_span!("seeding");
    async {
        let admin = storefront
            .customers
            .register(CustomerCreate {
                name: "Store Admin".to_string(),
                email: "admin@uthraa.example".to_string(),
                role: Role::Admin,
            })
            .await
            .map_err(|e| e.to_string())?;
        let shopper = storefront
            .customers
            .register(CustomerCreate {
                name: "Lakshmi".to_string(),
                email: "lakshmi@example.com".to_string(),
                role: Role::Customer,
            })
            .await
            .map_err(|e| e.to_string())?;
        info!(%admin, %shopper, "Customers registered");

        let oil = storefront
            .products
            .add_product(ProductCreate {
                name: "Cold-pressed Coconut Oil".to_string(),
                category: "Oils".to_string(),
                unit_price: 45_000,
                stock: 20,
            })
            .await
            .map_err(|e| e.to_string())?;
        let soap = storefront
            .products
            .add_product(ProductCreate {
                name: "Neem Soap".to_string(),
                category: "Bath".to_string(),
                unit_price: 12_000,
                stock: 50,
            })
            .await
            .map_err(|e| e.to_string())?;

        match storefront
            .orders
            .place_order(OrderCreate {
                customer_id: shopper,
                items: vec![
                    LineRequest { product_id: oil, quantity: 1 },
                    LineRequest { product_id: soap, quantity: 3 },
                ],
                address_id: "addr_home".to_string(),
                payment_method: PaymentMethod::CashOnDelivery,
                shipping_fee: 4_000,
            })
            .await
        {
            Ok(order) => info!(order_number = %order.order_number, id = %order.id, total = order.total, "Demo order placed"),
            Err(e) => error!(error = %e, "Demo order failed"),
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let gateway = Gateway::bind(&config.tracking.listen, storefront.dispatcher())
        .await
        .map_err(|e| e.to_string())?;
    gateway
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
            }
        })
        .await
        .map_err(|e| e.to_string())?;

    storefront.shutdown().await?;
    info!("Storefront stopped");
    Ok(())
}
