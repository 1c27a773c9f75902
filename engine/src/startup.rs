use std::sync::Arc;

use fleet_core::{Event, RouteProvider};
use mem_storage::MemStorage;
use osrm_client::OsrmClient;
use tokio::sync::mpsc;

use crate::{
    AlertStore, LiveSession, Settings, SimulationEngine, SubscriptionBroker, TrackingRegistry,
};

pub struct App {
    pub storage: Arc<MemStorage>,
    pub registry: TrackingRegistry<MemStorage>,
    pub alerts: AlertStore<MemStorage>,
    pub broker: SubscriptionBroker,
    client_buffer_size: usize,
}

impl App {
    pub async fn build(settings: &Settings) -> App {
        let storage = Arc::new(MemStorage::default());
        let broker = SubscriptionBroker::new(settings.broker_buffer_size);
        let alerts = AlertStore::new(storage.clone(), broker.clone());

        let route_provider: Arc<dyn RouteProvider> = Arc::new(OsrmClient::new(&settings.osrm));

        let simulation = SimulationEngine::new(
            storage.clone(),
            route_provider,
            broker.clone(),
            alerts.clone(),
            settings.route_timeout,
        );

        App {
            storage,
            registry: TrackingRegistry::new(simulation),
            alerts,
            broker,
            client_buffer_size: settings.client_buffer_size,
        }
    }

    pub fn connect_client(&self) -> (LiveSession<MemStorage>, mpsc::Receiver<Event>) {
        LiveSession::connect(
            self.registry.clone(),
            self.broker.clone(),
            self.client_buffer_size,
        )
    }
}
