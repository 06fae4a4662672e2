//! # Tracking Hub
//!
//! The single owner of every channel membership in the process. Like the
//! collection actors, it is one Tokio task draining one request queue, so
//! joins, leaves and publishes never race each other.
//!
//! Each connection registers a bounded outbox. Publishing `try_send`s into the
//! outboxes of the channel's members: a full outbox drops that one update, a
//! closed outbox removes the connection. Neither reaches the publisher.

use super::client::HubClient;
use super::events::StatusUpdate;
use super::TrackingError;
use crate::order_number::{OrderNumber, OrderRef};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

pub type ConnectionId = u64;

pub const CHANNEL_PREFIX: &str = "order-";

/// `order-<display id>`, the routing key for one order's updates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn for_order(reference: &OrderRef) -> Self {
        Self(format!("{CHANNEL_PREFIX}{reference}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&OrderNumber> for ChannelName {
    fn from(number: &OrderNumber) -> Self {
        Self(format!("{CHANNEL_PREFIX}{number}"))
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
pub enum HubRequest {
    Connect {
        outbox: mpsc::Sender<StatusUpdate>,
        respond_to: oneshot::Sender<ConnectionId>,
    },
    /// Replies `true` if the membership is new.
    Subscribe {
        connection: ConnectionId,
        channel: ChannelName,
        respond_to: oneshot::Sender<Result<bool, TrackingError>>,
    },
    /// Replies `true` if a membership was removed.
    Unsubscribe {
        connection: ConnectionId,
        channel: ChannelName,
        respond_to: oneshot::Sender<bool>,
    },
    /// Replies with the number of subscribers the update reached.
    Publish {
        channel: ChannelName,
        update: StatusUpdate,
        respond_to: oneshot::Sender<usize>,
    },
    Disconnect {
        connection: ConnectionId,
    },
}

struct Subscriber {
    outbox: mpsc::Sender<StatusUpdate>,
    channels: HashSet<ChannelName>,
}

pub struct TrackingHub {
    receiver: mpsc::Receiver<HubRequest>,
    channels: HashMap<ChannelName, HashSet<ConnectionId>>,
    subscribers: HashMap<ConnectionId, Subscriber>,
    next_connection: ConnectionId,
}

impl TrackingHub {
    pub fn new(buffer_size: usize) -> (Self, HubClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let hub = Self {
            receiver,
            channels: HashMap::new(),
            subscribers: HashMap::new(),
            next_connection: 1,
        };
        (hub, HubClient::new(sender))
    }

    /// Processes requests until every [`HubClient`] is gone.
    pub async fn run(mut self) {
        info!("Tracking hub started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                HubRequest::Connect { outbox, respond_to } => {
                    self.prune_closed();
                    let connection = self.next_connection;
                    self.next_connection += 1;
                    self.subscribers.insert(
                        connection,
                        Subscriber { outbox, channels: HashSet::new() },
                    );
                    debug!(connection, connections = self.subscribers.len(), "Connected");
                    let _ = respond_to.send(connection);
                }
                HubRequest::Subscribe { connection, channel, respond_to } => {
                    let _ = respond_to.send(self.subscribe(connection, channel));
                }
                HubRequest::Unsubscribe { connection, channel, respond_to } => {
                    let _ = respond_to.send(self.unsubscribe(connection, &channel));
                }
                HubRequest::Publish { channel, update, respond_to } => {
                    let _ = respond_to.send(self.publish(&channel, update));
                }
                HubRequest::Disconnect { connection } => {
                    self.disconnect(connection);
                }
            }
        }

        info!(connections = self.subscribers.len(), "Tracking hub shutdown");
    }

    fn subscribe(&mut self, connection: ConnectionId, channel: ChannelName) -> Result<bool, TrackingError> {
        self.prune_closed();
        let subscriber = self
            .subscribers
            .get_mut(&connection)
            .ok_or(TrackingError::UnknownConnection(connection))?;
        let added = subscriber.channels.insert(channel.clone());
        self.channels.entry(channel.clone()).or_default().insert(connection);
        debug!(connection, %channel, added, "Subscribe");
        Ok(added)
    }

    fn unsubscribe(&mut self, connection: ConnectionId, channel: &ChannelName) -> bool {
        let removed = self
            .subscribers
            .get_mut(&connection)
            .is_some_and(|subscriber| subscriber.channels.remove(channel));
        self.leave_channel(connection, channel);
        debug!(connection, %channel, removed, "Unsubscribe");
        removed
    }

    fn publish(&mut self, channel: &ChannelName, update: StatusUpdate) -> usize {
        let members: Vec<ConnectionId> = match self.channels.get(channel) {
            Some(members) => members.iter().copied().collect(),
            None => Vec::new(),
        };

        let mut delivered = 0;
        let mut gone = Vec::new();
        for connection in members {
            let Some(subscriber) = self.subscribers.get(&connection) else {
                continue;
            };
            match subscriber.outbox.try_send(update.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(connection, %channel, "Outbox full, update dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => gone.push(connection),
            }
        }
        for connection in gone {
            debug!(connection, "Outbox closed");
            self.disconnect(connection);
        }

        info!(%channel, status = %update.status, delivered, "Published");
        delivered
    }

    fn disconnect(&mut self, connection: ConnectionId) {
        if let Some(subscriber) = self.subscribers.remove(&connection) {
            for channel in &subscriber.channels {
                self.leave_channel(connection, channel);
            }
            debug!(connection, dropped = subscriber.channels.len(), "Disconnected");
        }
    }

    /// Drops connections whose inbox was released without a disconnect
    /// reaching the queue.
    fn prune_closed(&mut self) {
        let closed: Vec<ConnectionId> = self
            .subscribers
            .iter()
            .filter(|(_, subscriber)| subscriber.outbox.is_closed())
            .map(|(connection, _)| *connection)
            .collect();
        for connection in closed {
            debug!(connection, "Pruning closed outbox");
            self.disconnect(connection);
        }
    }

    fn leave_channel(&mut self, connection: ConnectionId, channel: &ChannelName) {
        if let Some(members) = self.channels.get_mut(channel) {
            members.remove(&connection);
            if members.is_empty() {
                self.channels.remove(channel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus;

    fn channel(reference: &str) -> ChannelName {
        ChannelName::for_order(&OrderRef::parse(reference).unwrap())
    }

    fn shipped(order_id: &str) -> StatusUpdate {
        StatusUpdate {
            order_id: order_id.into(),
            status: OrderStatus::Shipped,
            tracking_number: None,
            estimated_delivery: None,
        }
    }

    fn start() -> HubClient {
        let (hub, client) = TrackingHub::new(16);
        tokio::spawn(hub.run());
        client
    }

    #[test]
    fn test_channel_name_strips_legacy_prefix() {
        assert_eq!(channel("#ORD00007").as_str(), "order-ORD00007");
        assert_eq!(channel("ORD00007"), channel(" #ORD00007 "));
    }

    #[tokio::test]
    async fn test_publish_reaches_only_subscribers_until_disconnect() {
        let hub = start();
        let mut a = hub.connect(8).await.unwrap();
        let mut b = hub.connect(8).await.unwrap();

        hub.subscribe(a.id(), channel("ORD00007")).await.unwrap();
        let delivered = hub.publish(channel("ORD00007"), shipped("ORD00007")).await.unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(a.try_recv(), Some(shipped("ORD00007")));
        assert_eq!(b.try_recv(), None);

        drop(a);
        let delivered = hub.publish(channel("ORD00007"), shipped("ORD00007")).await.unwrap();
        assert_eq!(delivered, 0);
        assert_eq!(b.try_recv(), None);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let hub = start();
        let mut a = hub.connect(8).await.unwrap();

        hub.subscribe(a.id(), channel("ORD00003")).await.unwrap();
        assert!(hub.unsubscribe(a.id(), channel("ORD00003")).await.unwrap());
        assert!(!hub.unsubscribe(a.id(), channel("ORD00003")).await.unwrap());

        let delivered = hub.publish(channel("ORD00003"), shipped("ORD00003")).await.unwrap();
        assert_eq!(delivered, 0);
        assert_eq!(a.try_recv(), None);
    }

    #[tokio::test]
    async fn test_subscribe_is_idempotent() {
        let hub = start();
        let mut a = hub.connect(8).await.unwrap();

        assert!(hub.subscribe(a.id(), channel("ORD00001")).await.unwrap());
        assert!(!hub.subscribe(a.id(), channel("ORD00001")).await.unwrap());

        let delivered = hub.publish(channel("ORD00001"), shipped("ORD00001")).await.unwrap();
        assert_eq!(delivered, 1);
        assert!(a.try_recv().is_some());
        assert_eq!(a.try_recv(), None);
    }

    #[tokio::test]
    async fn test_full_outbox_drops_update_without_failing_publish() {
        let hub = start();
        let mut slow = hub.connect(1).await.unwrap();
        let mut fast = hub.connect(8).await.unwrap();
        for connection in [&slow, &fast] {
            hub.subscribe(connection.id(), channel("ORD00002")).await.unwrap();
        }

        assert_eq!(hub.publish(channel("ORD00002"), shipped("ORD00002")).await.unwrap(), 2);
        assert_eq!(hub.publish(channel("ORD00002"), shipped("ORD00002")).await.unwrap(), 1);

        assert!(slow.try_recv().is_some());
        assert_eq!(slow.try_recv(), None);
        assert!(fast.try_recv().is_some());
        assert!(fast.try_recv().is_some());
    }

    #[tokio::test]
    async fn test_dropped_connections_are_forgotten_when_queue_is_tight() {
        let (hub, client) = TrackingHub::new(1);
        tokio::spawn(hub.run());
        let a = client.connect(8).await.unwrap();
        let b = client.connect(8).await.unwrap();
        let (a_id, b_id) = (a.id(), b.id());
        client.subscribe(b_id, channel("ORD00004")).await.unwrap();

        drop(a);
        drop(b);

        let err = client.subscribe(b_id, channel("ORD00004")).await.unwrap_err();
        assert_eq!(err, TrackingError::UnknownConnection(b_id));
        let err = client.subscribe(a_id, channel("ORD00004")).await.unwrap_err();
        assert_eq!(err, TrackingError::UnknownConnection(a_id));
        let delivered = client.publish(channel("ORD00004"), shipped("ORD00004")).await.unwrap();
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_unknown_connection_cannot_subscribe() {
        let hub = start();
        let err = hub.subscribe(99, channel("ORD00001")).await.unwrap_err();
        assert_eq!(err, TrackingError::UnknownConnection(99));
    }
}
