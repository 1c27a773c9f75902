use fleet_core::{Coordinates, CoreResult, RouteProgress, TrackedVehicle, TrackingSession, VehicleId};

use crate::{SimulationEngine, Storage};

/// Query and control surface over the set of live tracking sessions.
pub struct TrackingRegistry<S> {
    simulation: SimulationEngine<S>,
}

impl<S> Clone for TrackingRegistry<S> {
    fn clone(&self) -> Self {
        TrackingRegistry {
            simulation: self.simulation.clone(),
        }
    }
}

impl<S: Storage> TrackingRegistry<S> {
    pub fn new(simulation: SimulationEngine<S>) -> TrackingRegistry<S> {
        TrackingRegistry { simulation }
    }

    pub async fn start_tracking(
        &self,
        vehicle_id: &VehicleId,
        origin: Coordinates,
        destination: Coordinates,
    ) -> CoreResult<TrackingSession> {
        self.simulation
            .start_tracking(vehicle_id, origin, destination)
            .await
    }

    /// Returns whether the vehicle was tracked, stopping an untracked
    /// vehicle is a no-op.
    pub async fn stop_tracking(&self, vehicle_id: &VehicleId) -> bool {
        self.simulation.stop_tracking(vehicle_id).await
    }

    pub async fn route_progress(&self, vehicle_id: &VehicleId) -> Option<RouteProgress> {
        self.simulation.route_progress(vehicle_id).await
    }

    pub async fn tracked_vehicles(&self) -> Vec<TrackedVehicle> {
        self.simulation.tracked_vehicles().await
    }
}
