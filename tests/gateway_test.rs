use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use uthraa_orders::config::Config;
use uthraa_orders::lifecycle::Storefront;
use uthraa_orders::model::{
    CustomerCreate, LineRequest, OrderCreate, PaymentMethod, ProductCreate, Role,
};
use uthraa_orders::tracking::{ChannelName, Gateway, StatusUpdate};

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let (reader, writer) = TcpStream::connect(addr).await.unwrap().into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send(&mut self, event: Value) {
        let mut line = event.to_string();
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await.unwrap();
    }

    async fn send_raw(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
    }

    async fn next(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timed out waiting for event")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }
}

#[tokio::test]
async fn test_gateway_session_flow() {
    let storefront = Storefront::new(&Config::default());
    let admin = storefront
        .customers
        .register(CustomerCreate {
            name: "Admin".into(),
            email: "admin@example.com".into(),
            role: Role::Admin,
        })
        .await
        .unwrap();
    let shopper = storefront
        .customers
        .register(CustomerCreate {
            name: "Kavya".into(),
            email: "kavya@example.com".into(),
            role: Role::Customer,
        })
        .await
        .unwrap();
    let soap = storefront
        .products
        .add_product(ProductCreate {
            name: "Neem Soap".into(),
            category: "Bath".into(),
            unit_price: 12_000,
            stock: 5,
        })
        .await
        .unwrap();
    storefront
        .orders
        .place_order(OrderCreate {
            customer_id: shopper,
            items: vec![LineRequest { product_id: soap, quantity: 2 }],
            address_id: "addr_1".into(),
            payment_method: PaymentMethod::CashOnDelivery,
            shipping_fee: 0,
        })
        .await
        .unwrap();

    let gateway = Gateway::bind("127.0.0.1:0", storefront.dispatcher()).await.unwrap();
    let addr = gateway.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(gateway.serve(async {
        let _ = stopped.await;
    }));

    let mut follower = Client::connect(addr).await;
    follower
        .send(json!({"event": "join-order-tracking", "data": {"orderId": "#ORD00001"}}))
        .await;
    assert_eq!(
        follower.next().await,
        json!({"event": "joined", "data": {"orderId": "#ORD00001", "channel": "order-ORD00001"}})
    );

    let mut desk = Client::connect(addr).await;
    desk.send(json!({
        "event": "admin-status-update",
        "data": {"orderId": "ORD00001", "status": "confirmed"}
    }))
    .await;
    assert_eq!(desk.next().await["event"], "error");

    desk.send(json!({"event": "identify", "data": {"customerId": admin.0}}))
        .await;
    assert_eq!(
        desk.next().await,
        json!({"event": "identified", "data": {"customerId": admin.0}})
    );

    desk.send(json!({
        "event": "admin-status-update",
        "data": {"orderId": "ORD00001", "status": "confirmed"}
    }))
    .await;
    let ack = desk.next().await;
    assert_eq!(ack["event"], "order-status-updated");
    assert_eq!(ack["data"]["status"], "confirmed");

    assert_eq!(
        follower.next().await,
        json!({"event": "order-status-updated", "data": {"orderId": "ORD00001", "status": "confirmed"}})
    );

    follower.send_raw("{\"event\":\"nonsense\"}\n").await;
    assert_eq!(follower.next().await["event"], "error");

    drop(follower);
    desk.send(json!({
        "event": "admin-status-update",
        "data": {"orderId": "ORD00001", "status": "processing"}
    }))
    .await;
    let ack = desk.next().await;
    assert_eq!(ack["event"], "order-status-updated");
    assert_eq!(ack["data"]["status"], "processing");

    let order = storefront.orders.resolve("ORD00001").await.unwrap();
    let channel = ChannelName::from(&order.order_number);
    let delivered = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let delivered = storefront
                .hub
                .publish(channel.clone(), StatusUpdate::from(&order))
                .await
                .unwrap();
            if delivered == 0 {
                break delivered;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("closed session kept its channel membership");
    assert_eq!(delivered, 0);

    drop(desk);
    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
    storefront.shutdown().await.unwrap();
}
