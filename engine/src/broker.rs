use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use fleet_core::{Event, SubscriptionFilter};
use tokio::sync::mpsc;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(u64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

enum Command {
    Subscribe {
        client: ClientId,
        filter: SubscriptionFilter,
        sender: mpsc::Sender<Event>,
    },
    Unsubscribe {
        client: ClientId,
    },
    Publish {
        event: Event,
    },
}

struct Subscriber {
    filter: SubscriptionFilter,
    sender: mpsc::Sender<Event>,
}

/// Pub/sub fan-out hub between event producers and live clients. All
/// subscription state lives in a single dispatch task, publishers and
/// subscribers only ever touch the command channel. A subscriber whose
/// channel is full or closed is evicted on the next delivery attempt.
#[derive(Clone)]
pub struct SubscriptionBroker {
    commands: async_channel::Sender<Command>,
    next_client: Arc<AtomicU64>,
}

impl SubscriptionBroker {
    pub fn new(buffer_size: usize) -> SubscriptionBroker {
        let (sender, receiver) = async_channel::bounded(buffer_size);
        tokio::spawn(fan_out(receiver));
        SubscriptionBroker {
            commands: sender,
            next_client: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn register_client(&self) -> ClientId {
        ClientId(self.next_client.fetch_add(1, Ordering::Relaxed))
    }

    /// Adds or replaces the subscription of the given client.
    pub async fn subscribe(
        &self,
        client: ClientId,
        filter: SubscriptionFilter,
        sender: mpsc::Sender<Event>,
    ) {
        self.send(Command::Subscribe {
            client,
            filter,
            sender,
        })
        .await;
    }

    pub async fn unsubscribe(&self, client: ClientId) {
        self.send(Command::Unsubscribe { client }).await;
    }

    pub async fn publish(&self, event: Event) {
        self.send(Command::Publish { event }).await;
    }

    async fn send(&self, command: Command) {
        if self.commands.send(command).await.is_err() {
            error!("broker dispatch task is gone, dropping command");
        }
    }
}

async fn fan_out(receiver: async_channel::Receiver<Command>) {
    let mut subscribers: HashMap<ClientId, Subscriber> = HashMap::new();

    while let Ok(command) = receiver.recv().await {
        match command {
            Command::Subscribe {
                client,
                filter,
                sender,
            } => {
                subscribers.insert(client, Subscriber { filter, sender });
            }
            Command::Unsubscribe { client } => {
                subscribers.remove(&client);
            }
            Command::Publish { event } => {
                subscribers.retain(|client, subscriber| {
                    if !subscriber.filter.matches(&event) {
                        return true;
                    }
                    match subscriber.sender.try_send(event.clone()) {
                        Ok(()) => true,
                        Err(e) => {
                            warn!("evicting client {client}, send failed: {e}");
                            false
                        }
                    }
                });
            }
        }
    }
}
