use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    Alert, AlertId, AlertsPage, AlertsQuery, Coordinates, CoreResult, Vehicle, VehicleId,
    VehicleStatus,
};

/// Persistence port for vehicle records. Updates are atomic
/// per-document at the storage boundary.
#[async_trait]
pub trait VehicleStorage: Send + Sync {
    async fn vehicle(&self, id: &VehicleId) -> CoreResult<Option<Vehicle>>;
    async fn update_vehicle_position(
        &self,
        id: &VehicleId,
        position: Coordinates,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<()>;
    async fn update_vehicle_status(&self, id: &VehicleId, status: VehicleStatus)
    -> CoreResult<()>;
}

/// Persistence port for the alert lifecycle store.
#[async_trait]
pub trait AlertStorage: Send + Sync {
    async fn add_alert(&self, alert: &Alert) -> CoreResult<()>;
    async fn alert(&self, id: AlertId) -> CoreResult<Option<Alert>>;
    async fn update_alert(&self, alert: &Alert) -> CoreResult<()>;
    async fn alerts(&self, query: &AlertsQuery) -> CoreResult<AlertsPage>;
}
