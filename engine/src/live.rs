use fleet_core::{ClientMessage, Event};
use tokio::sync::mpsc;
use tracing::warn;

use crate::{ClientId, Storage, SubscriptionBroker, TrackingRegistry};

/// Server side of one live client connection. Inbound text frames go
/// through [`LiveSession::handle_message`], outbound events arrive on
/// the receiver handed out by [`LiveSession::connect`]. Malformed
/// input never tears the session down, the client gets an `error`
/// event instead.
pub struct LiveSession<S> {
    client: ClientId,
    registry: TrackingRegistry<S>,
    broker: SubscriptionBroker,
    sender: mpsc::Sender<Event>,
}

impl<S: Storage> LiveSession<S> {
    pub fn connect(
        registry: TrackingRegistry<S>,
        broker: SubscriptionBroker,
        buffer_size: usize,
    ) -> (LiveSession<S>, mpsc::Receiver<Event>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let client = broker.register_client();
        (
            LiveSession {
                client,
                registry,
                broker,
                sender,
            },
            receiver,
        )
    }

    pub async fn handle_message(&self, raw: &str) {
        if serde_json::from_str::<serde_json::Value>(raw).is_err() {
            self.send_error("invalid message format").await;
            return;
        }

        let message = match serde_json::from_str::<ClientMessage>(raw) {
            Ok(message) => message,
            Err(_) => {
                self.send_error("unknown message type").await;
                return;
            }
        };

        match message {
            ClientMessage::Subscribe { filter } => {
                self.broker
                    .subscribe(self.client, filter, self.sender.clone())
                    .await;
            }
            ClientMessage::Unsubscribe => {
                self.broker.unsubscribe(self.client).await;
            }
            ClientMessage::GetRouteProgress { vehicle_id, .. } => {
                match self.registry.route_progress(&vehicle_id).await {
                    Some(progress) => {
                        self.send(Event::RouteProgress {
                            vehicle_id,
                            data: progress,
                        })
                        .await;
                    }
                    None => {
                        self.send_error(format!("vehicle '{vehicle_id}' is not tracked"))
                            .await;
                    }
                }
            }
        }
    }

    pub async fn close(&self) {
        self.broker.unsubscribe(self.client).await;
    }

    async fn send_error(&self, message: impl Into<String>) {
        self.send(Event::Error {
            message: message.into(),
        })
        .await;
    }

    async fn send(&self, event: Event) {
        if self.sender.send(event).await.is_err() {
            warn!("client {} is gone, dropping direct event", self.client);
        }
    }
}
