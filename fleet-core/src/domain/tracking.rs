use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Coordinates, Route, VehicleId};

/// Runtime record of one vehicle's in-progress simulated traversal of
/// a route. Created by `start_tracking`, mutated only by its own
/// scheduled tick, destroyed on `stop_tracking` or on reaching the
/// final waypoint.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    pub vehicle_id: VehicleId,
    pub route: Route,
    pub started_at: DateTime<Utc>,
    pub current_step: usize,
    pub tick_interval: Duration,
}

impl TrackingSession {
    pub fn new(vehicle_id: VehicleId, route: Route) -> TrackingSession {
        let tick_interval = route.tick_interval();
        TrackingSession {
            vehicle_id,
            route,
            started_at: Utc::now(),
            current_step: 0,
            tick_interval,
        }
    }

    /// Share of waypoints visited so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.current_step as f64 / self.route.waypoints.len() as f64
    }

    pub fn is_completed(&self) -> bool {
        self.current_step >= self.route.waypoints.len()
    }

    /// The waypoint the simulation expects the vehicle at on this step.
    pub fn expected_waypoint(&self) -> Option<Coordinates> {
        self.route.waypoints.get(self.current_step).copied()
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> f64 {
        (now - self.started_at).num_milliseconds() as f64 / 1_000.0
    }

    pub fn route_progress(&self, now: DateTime<Utc>) -> RouteProgress {
        let elapsed_time = self.elapsed_seconds(now);
        RouteProgress {
            total_distance: self.route.distance_meters,
            total_duration: self.route.duration_seconds,
            elapsed_time,
            progress: (elapsed_time / self.route.duration_seconds).min(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProgress {
    pub total_distance: f64,
    pub total_duration: f64,
    pub elapsed_time: f64,
    pub progress: f64,
}

/// Dashboard snapshot of one live tracking session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedVehicle {
    pub vehicle_id: VehicleId,
    pub last_update: DateTime<Utc>,
    pub location: Coordinates,
}
