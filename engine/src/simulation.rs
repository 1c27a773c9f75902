use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use fleet_core::{
    Coordinates, CoreResult, Event, RouteProgress, RouteProvider, TrackedVehicle,
    TrackingSession, Vehicle, VehicleId, VehicleStatus,
    core_error::{ConflictSnafu, NotFoundSnafu, UpstreamUnavailableSnafu},
};
use snafu::{OptionExt, ensure};
use tokio::sync::{Notify, RwLock};
use tracing::{error, instrument, warn};

use crate::{AlertStore, AnomalyDetector, Storage, SubscriptionBroker};

struct ActiveSession {
    session: TrackingSession,
    last_update: DateTime<Utc>,
    last_location: Coordinates,
    previous_status: Option<VehicleStatus>,
    cancel: Arc<Notify>,
}

enum TickOutcome {
    Continue,
    Finished,
}

/// Drives simulated traversals of routed journeys. Each tracked
/// vehicle owns one session and one driver task, the task walks the
/// route one waypoint per tick, persists the position, publishes it
/// and runs the anomaly checks. Stopping cancels the pending tick but
/// never interrupts one already in flight.
pub struct SimulationEngine<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    storage: Arc<S>,
    route_provider: Arc<dyn RouteProvider>,
    broker: SubscriptionBroker,
    alerts: AlertStore<S>,
    detector: AnomalyDetector,
    route_timeout: Duration,
    sessions: RwLock<HashMap<VehicleId, ActiveSession>>,
}

impl<S> Clone for SimulationEngine<S> {
    fn clone(&self) -> Self {
        SimulationEngine {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Storage> SimulationEngine<S> {
    pub fn new(
        storage: Arc<S>,
        route_provider: Arc<dyn RouteProvider>,
        broker: SubscriptionBroker,
        alerts: AlertStore<S>,
        route_timeout: Duration,
    ) -> SimulationEngine<S> {
        SimulationEngine {
            inner: Arc::new(Inner {
                storage,
                route_provider,
                broker,
                alerts,
                detector: AnomalyDetector,
                route_timeout,
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Routes the vehicle from `origin` to `destination` and starts
    /// the driver task. Fails if the vehicle is unknown, already
    /// tracked, or the routing collaborator is unreachable.
    #[instrument(skip_all, fields(vehicle_id = %vehicle_id))]
    pub async fn start_tracking(
        &self,
        vehicle_id: &VehicleId,
        origin: Coordinates,
        destination: Coordinates,
    ) -> CoreResult<TrackingSession> {
        let inner = &self.inner;

        let vehicle = inner
            .storage
            .vehicle(vehicle_id)
            .await?
            .context(NotFoundSnafu {
                entity: "vehicle",
                id: vehicle_id.to_string(),
            })?;

        ensure!(
            !inner.sessions.read().await.contains_key(vehicle_id),
            ConflictSnafu {
                reason: format!("vehicle '{vehicle_id}' is already tracked"),
            }
        );

        let route = match tokio::time::timeout(
            inner.route_timeout,
            inner.route_provider.route(origin, destination),
        )
        .await
        {
            Ok(route) => route?,
            Err(_) => {
                return UpstreamUnavailableSnafu {
                    service: "routing",
                    error_stringified: "request timed out",
                }
                .fail();
            }
        };

        ensure!(
            !route.waypoints.is_empty(),
            UpstreamUnavailableSnafu {
                service: "routing",
                error_stringified: "route contains no waypoints",
            }
        );

        let session = TrackingSession::new(vehicle_id.clone(), route);
        let cancel = Arc::new(Notify::new());

        {
            let mut sessions = inner.sessions.write().await;
            ensure!(
                !sessions.contains_key(vehicle_id),
                ConflictSnafu {
                    reason: format!("vehicle '{vehicle_id}' is already tracked"),
                }
            );
            sessions.insert(
                vehicle_id.clone(),
                ActiveSession {
                    session: session.clone(),
                    last_update: session.started_at,
                    last_location: vehicle.position(),
                    previous_status: Some(vehicle.status()),
                    cancel: cancel.clone(),
                },
            );
        }

        let engine = self.clone();
        let id = vehicle_id.clone();
        tokio::spawn(async move {
            engine.run_session(id, cancel).await;
        });

        Ok(session)
    }

    /// Cancels the pending tick and discards the session. A tick
    /// already executing finishes on its own and finds the session
    /// gone. Returns whether the vehicle was tracked.
    pub async fn stop_tracking(&self, vehicle_id: &VehicleId) -> bool {
        match self.inner.sessions.write().await.remove(vehicle_id) {
            Some(active) => {
                active.cancel.notify_one();
                true
            }
            None => false,
        }
    }

    pub async fn route_progress(&self, vehicle_id: &VehicleId) -> Option<RouteProgress> {
        self.inner
            .sessions
            .read()
            .await
            .get(vehicle_id)
            .map(|active| active.session.route_progress(Utc::now()))
    }

    pub async fn tracked_vehicles(&self) -> Vec<TrackedVehicle> {
        self.inner
            .sessions
            .read()
            .await
            .values()
            .map(|active| TrackedVehicle {
                vehicle_id: active.session.vehicle_id.clone(),
                last_update: active.last_update,
                location: active.last_location,
            })
            .collect()
    }

    async fn run_session(&self, vehicle_id: VehicleId, cancel: Arc<Notify>) {
        loop {
            let interval = {
                match self.inner.sessions.read().await.get(&vehicle_id) {
                    Some(active) => active.session.tick_interval,
                    None => return,
                }
            };

            tokio::select! {
                _ = cancel.notified() => return,
                _ = tokio::time::sleep(interval) => {}
            }

            match self.tick(&vehicle_id).await {
                Ok(TickOutcome::Continue) => {}
                Ok(TickOutcome::Finished) => return,
                Err(e) => error!("tick failed for vehicle '{vehicle_id}': {e}"),
            }
        }
    }

    /// One simulation step. Persistence failures are logged and the
    /// step still advances, a flaky store must not stall the route.
    async fn tick(&self, vehicle_id: &VehicleId) -> CoreResult<TickOutcome> {
        let inner = &self.inner;

        let (snapshot, previous_status) = {
            match inner.sessions.read().await.get(vehicle_id) {
                Some(active) => (active.session.clone(), active.previous_status),
                None => return Ok(TickOutcome::Finished),
            }
        };

        let Some(waypoint) = snapshot.expected_waypoint() else {
            inner.sessions.write().await.remove(vehicle_id);
            self.finish(vehicle_id, None).await;
            return Ok(TickOutcome::Finished);
        };

        let now = Utc::now();
        if let Err(e) = inner
            .storage
            .update_vehicle_position(vehicle_id, waypoint, now)
            .await
        {
            warn!("failed to persist position of vehicle '{vehicle_id}': {e}");
        }

        let vehicle = match inner.storage.vehicle(vehicle_id).await {
            Ok(vehicle) => vehicle,
            Err(e) => {
                warn!("failed to load vehicle '{vehicle_id}': {e}");
                None
            }
        };

        let completed = {
            let mut sessions = inner.sessions.write().await;
            let Some(active) = sessions.get_mut(vehicle_id) else {
                // Stopped while this tick was running, drop the result.
                return Ok(TickOutcome::Finished);
            };
            active.session.current_step += 1;
            active.last_update = now;
            active.last_location = waypoint;
            if let Some(vehicle) = &vehicle {
                active.previous_status = Some(vehicle.status());
            }

            let completed = active.session.is_completed();
            if completed {
                sessions.remove(vehicle_id);
            }
            completed
        };

        if completed {
            self.finish(vehicle_id, Some(waypoint)).await;
            if let Some(vehicle) = &vehicle {
                self.detect(&snapshot, vehicle, previous_status, now).await;
            }
            return Ok(TickOutcome::Finished);
        }

        // Stops take the write lock, so holding the read lock pins the
        // session for the broadcast and the alert checks.
        let sessions = inner.sessions.read().await;
        if !sessions.contains_key(vehicle_id) {
            return Ok(TickOutcome::Finished);
        }

        inner
            .broker
            .publish(Event::PositionUpdate {
                vehicle_id: vehicle_id.clone(),
                location: waypoint,
            })
            .await;

        if let Some(vehicle) = &vehicle {
            self.detect(&snapshot, vehicle, previous_status, now).await;
        }

        Ok(TickOutcome::Continue)
    }

    /// Final step of a finished route, runs after the caller has
    /// discarded the session. Marks the vehicle arrived and publishes
    /// the last position as the terminal event.
    async fn finish(&self, vehicle_id: &VehicleId, final_position: Option<Coordinates>) {
        let inner = &self.inner;

        match inner.storage.vehicle(vehicle_id).await {
            Ok(Some(vehicle)) => {
                if let Err(e) = inner
                    .storage
                    .update_vehicle_status(vehicle_id, vehicle.arrived_status())
                    .await
                {
                    warn!("failed to mark vehicle '{vehicle_id}' as arrived: {e}");
                }
            }
            Ok(None) => warn!("vehicle '{vehicle_id}' disappeared during tracking"),
            Err(e) => warn!("failed to load vehicle '{vehicle_id}': {e}"),
        }

        if let Some(location) = final_position {
            inner
                .broker
                .publish(Event::PositionUpdate {
                    vehicle_id: vehicle_id.clone(),
                    location,
                })
                .await;
        }
    }

    async fn detect(
        &self,
        session: &TrackingSession,
        vehicle: &Vehicle,
        previous_status: Option<VehicleStatus>,
        now: DateTime<Utc>,
    ) {
        for new in self
            .inner
            .detector
            .detect(session, vehicle, previous_status, now)
        {
            if let Err(e) = self.inner.alerts.create(new).await {
                error!(
                    "failed to create alert for vehicle '{}': {e}",
                    session.vehicle_id
                );
            }
        }
    }
}
