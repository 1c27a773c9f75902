use std::{
    sync::{Arc, Once},
    time::Duration,
};

use async_trait::async_trait;
use engine::{AlertStore, LiveSession, SimulationEngine, SubscriptionBroker, TrackingRegistry};
use fleet_core::{
    Coordinates, CoreResult, Event, Route, RouteProvider, Ship, SubscriptionFilter, Truck,
    Vehicle,
};
use mem_storage::MemStorage;
use tokio::sync::mpsc;
use tracing_subscriber::FmtSubscriber;

static TRACING: Once = Once::new();

pub struct TestHelper {
    pub storage: Arc<MemStorage>,
    pub broker: SubscriptionBroker,
    pub alerts: AlertStore<MemStorage>,
    pub registry: TrackingRegistry<MemStorage>,
}

impl TestHelper {
    pub fn new(route: Route) -> TestHelper {
        Self::with_provider(Arc::new(StaticRoute(route)))
    }

    pub fn with_provider(provider: Arc<dyn RouteProvider>) -> TestHelper {
        TRACING.call_once(|| {
            tracing::subscriber::set_global_default(
                FmtSubscriber::builder()
                    .with_max_level(tracing::Level::INFO)
                    .finish(),
            )
            .unwrap();
        });

        let storage = Arc::new(MemStorage::default());
        let broker = SubscriptionBroker::new(64);
        let alerts = AlertStore::new(storage.clone(), broker.clone());
        let simulation = SimulationEngine::new(
            storage.clone(),
            provider,
            broker.clone(),
            alerts.clone(),
            Duration::from_secs(5),
        );

        TestHelper {
            storage,
            broker,
            alerts,
            registry: TrackingRegistry::new(simulation),
        }
    }

    pub async fn add_truck(&self, id: &str) -> Vehicle {
        let vehicle = Vehicle::Truck(Truck::test_default(id));
        self.storage.add_vehicle(vehicle.clone()).await;
        vehicle
    }

    pub async fn add_ship(&self, ship: Ship) -> Vehicle {
        let vehicle = Vehicle::Ship(ship);
        self.storage.add_vehicle(vehicle.clone()).await;
        vehicle
    }

    pub async fn subscribe_all(&self) -> mpsc::Receiver<Event> {
        let (sender, receiver) = mpsc::channel(1024);
        let client = self.broker.register_client();
        self.broker
            .subscribe(client, SubscriptionFilter::default(), sender)
            .await;
        receiver
    }

    pub fn live_client(&self) -> (LiveSession<MemStorage>, mpsc::Receiver<Event>) {
        LiveSession::connect(self.registry.clone(), self.broker.clone(), 64)
    }
}

/// Returns the same route for every request.
pub struct StaticRoute(pub Route);

#[async_trait]
impl RouteProvider for StaticRoute {
    async fn route(&self, _origin: Coordinates, _destination: Coordinates) -> CoreResult<Route> {
        Ok(self.0.clone())
    }
}

/// Never answers, used to exercise the routing timeout.
pub struct UnresponsiveRouter;

#[async_trait]
impl RouteProvider for UnresponsiveRouter {
    async fn route(&self, _origin: Coordinates, _destination: Coordinates) -> CoreResult<Route> {
        std::future::pending().await
    }
}

/// A straight line of `waypoints` points, 0.001 degrees of latitude
/// apart.
pub fn line_route(waypoints: usize, duration_seconds: f64) -> Route {
    Route {
        waypoints: (0..waypoints)
            .map(|i| Coordinates::new(0.0, i as f64 * 0.001))
            .collect(),
        distance_meters: waypoints as f64 * 111.19,
        duration_seconds,
    }
}

pub async fn recv_event(receiver: &mut mpsc::Receiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(3_600), receiver.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Waits until the next published alert, skipping position updates.
pub async fn recv_alert(receiver: &mut mpsc::Receiver<Event>) -> fleet_core::Alert {
    loop {
        match recv_event(receiver).await {
            Event::Alert { data } => return data,
            _ => continue,
        }
    }
}
