use fleet_core::{Coordinates, Route};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    pub code: String,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub geometry: Geometry,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}

/// GeoJSON LineString, coordinates are `[lon, lat]` pairs.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<[f64; 2]>,
}

impl From<OsrmRoute> for Route {
    fn from(v: OsrmRoute) -> Self {
        Route {
            waypoints: v
                .geometry
                .coordinates
                .into_iter()
                .map(|[lon, lat]| Coordinates::new(lon, lat))
                .collect(),
            distance_meters: v.distance,
            duration_seconds: v.duration,
        }
    }
}
