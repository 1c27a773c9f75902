use async_trait::async_trait;

use crate::{Coordinates, CoreResult, Route};

/// External routing collaborator. Given origin/destination, returns an
/// ordered polyline of waypoints plus total distance and duration.
/// Failures surface as `Error::UpstreamUnavailable`.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn route(&self, origin: Coordinates, destination: Coordinates) -> CoreResult<Route>;
}
