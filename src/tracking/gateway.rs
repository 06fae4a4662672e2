//! # Tracking Gateway
//!
//! Newline-delimited JSON over TCP. Each socket is one
//! [`TrackingConnection`]: the session reads [`ClientEvent`]s, answers each
//! with one [`ServerEvent`], and interleaves pushed status updates as they
//! arrive. Closing the socket drops the connection and with it every
//! membership it held.

use super::client::TrackingConnection;
use super::events::{ClientEvent, ServerEvent, StatusUpdate};
use super::tracker::Tracker;
use super::TrackingError;
use crate::admin::AdminDesk;
use crate::model::StatusChange;
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

/// Routes each inbound event kind to the service that handles it.
#[derive(Clone)]
pub struct Dispatcher {
    tracker: Tracker,
    admin: AdminDesk,
}

impl Dispatcher {
    pub fn new(tracker: Tracker, admin: AdminDesk) -> Self {
        Self { tracker, admin }
    }

    /// Handles one event and produces the reply for the sender.
    ///
    /// Failures become [`ServerEvent::Error`]; the session stays open.
    pub async fn dispatch(&self, connection: &mut TrackingConnection, event: ClientEvent) -> ServerEvent {
        match event {
            ClientEvent::Identify { customer_id } => {
                match self.tracker.identify(connection, customer_id).await {
                    Ok(()) => ServerEvent::Identified { customer_id },
                    Err(e) => ServerEvent::error(e),
                }
            }
            ClientEvent::JoinOrderTracking { order_id } => {
                match self.tracker.join(connection, &order_id).await {
                    Ok(channel) => ServerEvent::Joined { order_id, channel: channel.to_string() },
                    Err(e) => ServerEvent::error(e),
                }
            }
            ClientEvent::LeaveOrderTracking { order_id } => {
                match self.tracker.leave(connection, &order_id).await {
                    Ok(channel) => ServerEvent::Left { order_id, channel: channel.to_string() },
                    Err(e) => ServerEvent::error(e),
                }
            }
            ClientEvent::AdminStatusUpdate {
                order_id,
                status,
                tracking_number,
                estimated_delivery,
            } => {
                let Some(admin) = connection.identity() else {
                    return ServerEvent::error("identify before updating orders");
                };
                let change = StatusChange {
                    status,
                    tracking_number,
                    estimated_delivery,
                };
                match self.admin.update_order_status(admin, &order_id, change).await {
                    Ok(order) => ServerEvent::OrderStatusUpdated(StatusUpdate::from(&order)),
                    Err(e) => ServerEvent::error(e),
                }
            }
        }
    }
}

pub struct Gateway {
    listener: TcpListener,
    dispatcher: Dispatcher,
}

impl Gateway {
    pub async fn bind(addr: &str, dispatcher: Dispatcher) -> Result<Self, GatewayError> {
        let listener = TcpListener::bind(addr).await.map_err(|source| GatewayError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        info!(addr = %listener.local_addr()?, "Tracking gateway listening");
        Ok(Self { listener, dispatcher })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, GatewayError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts sessions until `shutdown` resolves, then aborts the open ones.
    pub async fn serve(self, shutdown: impl Future<Output = ()>) -> Result<(), GatewayError> {
        tokio::pin!(shutdown);
        let mut sessions = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!(error = %e, "Accept failed");
                            continue;
                        }
                    };
                    let dispatcher = self.dispatcher.clone();
                    sessions.spawn(async move {
                        if let Err(e) = session(stream, dispatcher).await {
                            warn!(%peer, error = %e, "Session ended with error");
                        }
                    });
                }
                Some(finished) = sessions.join_next(), if !sessions.is_empty() => {
                    if let Err(e) = finished {
                        warn!(error = %e, "Session task failed");
                    }
                }
            }
        }

        info!(open = sessions.len(), "Tracking gateway stopping");
        sessions.shutdown().await;
        Ok(())
    }
}

async fn session(stream: TcpStream, dispatcher: Dispatcher) -> Result<(), GatewayError> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    let mut connection = dispatcher.tracker.connect().await?;
    debug!(connection_id = connection.id(), "Session opened");

    loop {
        let reply = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => match serde_json::from_str::<ClientEvent>(&line) {
                    Ok(event) => dispatcher.dispatch(&mut connection, event).await,
                    Err(e) => ServerEvent::error(format!("unrecognised event: {e}")),
                },
                None => break,
            },
            update = connection.recv() => match update {
                Some(update) => ServerEvent::OrderStatusUpdated(update),
                None => break,
            },
        };
        write_event(&mut writer, &reply).await?;
    }

    debug!(connection_id = connection.id(), "Session closed");
    Ok(())
}

async fn write_event(writer: &mut OwnedWriteHalf, event: &ServerEvent) -> Result<(), GatewayError> {
    let mut line = serde_json::to_vec(event)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    Ok(())
}
