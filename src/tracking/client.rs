//! Handles onto the [`TrackingHub`](super::TrackingHub).

use super::events::StatusUpdate;
use super::hub::{ChannelName, ConnectionId, HubRequest};
use super::TrackingError;
use crate::model::CustomerId;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Cloneable sender side of the hub.
#[derive(Clone)]
pub struct HubClient {
    sender: mpsc::Sender<HubRequest>,
}

impl HubClient {
    pub fn new(sender: mpsc::Sender<HubRequest>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> HubRequest,
    ) -> Result<R, TrackingError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| TrackingError::HubClosed)?;
        response.await.map_err(|_| TrackingError::HubDropped)
    }

    /// Registers a connection whose outbox holds up to `outbox_capacity` updates.
    pub async fn connect(&self, outbox_capacity: usize) -> Result<TrackingConnection, TrackingError> {
        let (outbox, inbox) = mpsc::channel(outbox_capacity.max(1));
        let id = self
            .request(|respond_to| HubRequest::Connect { outbox, respond_to })
            .await?;
        Ok(TrackingConnection {
            id,
            identity: None,
            inbox,
            hub: self.clone(),
        })
    }

    /// Idempotent. Returns `true` the first time.
    #[instrument(skip(self))]
    pub async fn subscribe(&self, connection: ConnectionId, channel: ChannelName) -> Result<bool, TrackingError> {
        debug!("Sending request");
        self.request(|respond_to| HubRequest::Subscribe { connection, channel, respond_to })
            .await?
    }

    /// Safe to call when not subscribed.
    #[instrument(skip(self))]
    pub async fn unsubscribe(&self, connection: ConnectionId, channel: ChannelName) -> Result<bool, TrackingError> {
        debug!("Sending request");
        self.request(|respond_to| HubRequest::Unsubscribe { connection, channel, respond_to })
            .await
    }

    /// Best-effort fan-out. Returns how many subscribers received the update.
    #[instrument(skip(self, update), fields(status = %update.status))]
    pub async fn publish(&self, channel: ChannelName, update: StatusUpdate) -> Result<usize, TrackingError> {
        debug!("Sending request");
        self.request(|respond_to| HubRequest::Publish { channel, update, respond_to })
            .await
    }

    /// Fire-and-forget; used from `Drop`. A full queue hands the request to a
    /// task that waits for room.
    fn disconnect(&self, connection: ConnectionId) {
        let request = match self.sender.try_send(HubRequest::Disconnect { connection }) {
            Ok(()) => return,
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(connection, "Hub closed before disconnect");
                return;
            }
            Err(mpsc::error::TrySendError::Full(request)) => request,
        };
        match Handle::try_current() {
            Ok(runtime) => {
                let sender = self.sender.clone();
                runtime.spawn(async move {
                    if sender.send(request).await.is_err() {
                        debug!(connection, "Hub closed before disconnect");
                    }
                });
            }
            Err(_) => debug!(connection, "No runtime for disconnect, hub prunes it later"),
        }
    }
}

/// One client's presence on the hub.
///
/// Dropping it removes every channel membership it holds. The hub also
/// forgets any connection whose inbox is gone the next time it accepts a
/// connection or a subscription.
pub struct TrackingConnection {
    id: ConnectionId,
    identity: Option<CustomerId>,
    inbox: mpsc::Receiver<StatusUpdate>,
    hub: HubClient,
}

impl TrackingConnection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The customer the transport says is on the other end, if any.
    pub fn identity(&self) -> Option<CustomerId> {
        self.identity
    }

    pub(crate) fn set_identity(&mut self, customer: CustomerId) {
        self.identity = Some(customer);
    }

    /// Waits for the next update. `None` once the hub has forgotten this connection.
    pub async fn recv(&mut self) -> Option<StatusUpdate> {
        self.inbox.recv().await
    }

    /// The next update if one is already queued.
    pub fn try_recv(&mut self) -> Option<StatusUpdate> {
        self.inbox.try_recv().ok()
    }
}

impl Drop for TrackingConnection {
    fn drop(&mut self) {
        self.hub.disconnect(self.id);
    }
}
