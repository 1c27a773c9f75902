use std::time::Duration;

use async_trait::async_trait;
use fleet_core::{Coordinates, CoreResult, Route, RouteProvider, core_error};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt, ensure};

use crate::{
    Result, RouteResponse,
    error::osrm_error::{EmptyResponseSnafu, FailedRequestSnafu, FailedRoutingSnafu, RequestSnafu},
};

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmSettings {
    pub base_url: String,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

/// Client for the OSRM route service, used as the routing collaborator
/// behind journey simulation.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(settings: &OsrmSettings) -> OsrmClient {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .unwrap();

        OsrmClient {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the fastest driving route between two points, as a full
    /// GeoJSON waypoint polyline.
    pub async fn fetch_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<Route> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, origin.lon, origin.lat, destination.lon, destination.lat,
        );

        let response = self.client.get(&url).send().await.context(RequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return FailedRequestSnafu { url, status, body }.fail();
        }

        let response: RouteResponse = response.json().await.context(RequestSnafu)?;
        ensure!(
            response.code == "Ok",
            FailedRoutingSnafu {
                code: response.code.clone(),
            }
        );

        let route = response
            .routes
            .into_iter()
            .next()
            .context(EmptyResponseSnafu)?;

        Ok(route.into())
    }
}

#[async_trait]
impl RouteProvider for OsrmClient {
    async fn route(&self, origin: Coordinates, destination: Coordinates) -> CoreResult<Route> {
        self.fetch_route(origin, destination).await.map_err(|e| {
            core_error::UpstreamUnavailableSnafu {
                service: "osrm",
                error_stringified: e.to_string(),
            }
            .build()
        })
    }
}
