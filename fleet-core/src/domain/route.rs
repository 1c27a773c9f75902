use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// An ordered waypoint polyline with total distance/duration, produced
/// by the routing collaborator. Immutable once computed, owned by the
/// tracking session traversing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub waypoints: Vec<Coordinates>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl Route {
    /// One position update per 1% of total duration, floored at 10 seconds.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64((self.duration_seconds / 100.0).max(10.0))
    }
}

#[cfg(feature = "test")]
mod test {
    use super::*;

    impl Route {
        pub fn test_default() -> Route {
            Route {
                waypoints: vec![
                    Coordinates::new(0.0, 0.0),
                    Coordinates::new(0.0, 0.5),
                    Coordinates::new(0.0, 1.0),
                ],
                distance_meters: 111_190.0,
                duration_seconds: 30.0,
            }
        }
    }
}
