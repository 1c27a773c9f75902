#![deny(warnings)]
#![deny(rust_2018_idioms)]

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleet_core::{
    Alert, AlertId, AlertStorage, AlertsPage, AlertsQuery, Coordinates, CoreResult, Ordering,
    Vehicle, VehicleId, VehicleStatus, VehicleStorage, core_error::NotFoundSnafu,
};
use tokio::sync::RwLock;

/// In-memory implementation of the persistence ports. All updates are
/// atomic per-document, each mutation swaps the full record under the
/// map lock.
#[derive(Default)]
pub struct MemStorage {
    vehicles: RwLock<HashMap<VehicleId, Vehicle>>,
    alerts: RwLock<HashMap<AlertId, Alert>>,
}

impl MemStorage {
    pub async fn add_vehicle(&self, vehicle: Vehicle) {
        self.vehicles
            .write()
            .await
            .insert(vehicle.id().clone(), vehicle);
    }

    pub async fn all_alerts(&self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self.alerts.read().await.values().cloned().collect();
        alerts.sort_by_key(|a| a.created_at);
        alerts
    }
}

#[async_trait]
impl VehicleStorage for MemStorage {
    async fn vehicle(&self, id: &VehicleId) -> CoreResult<Option<Vehicle>> {
        Ok(self.vehicles.read().await.get(id).cloned())
    }

    async fn update_vehicle_position(
        &self,
        id: &VehicleId,
        position: Coordinates,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<()> {
        let mut vehicles = self.vehicles.write().await;
        match vehicles.get_mut(id) {
            Some(vehicle) => {
                vehicle.set_position(position, timestamp);
                Ok(())
            }
            None => NotFoundSnafu {
                entity: "vehicle",
                id: id.to_string(),
            }
            .fail(),
        }
    }

    async fn update_vehicle_status(
        &self,
        id: &VehicleId,
        status: VehicleStatus,
    ) -> CoreResult<()> {
        let mut vehicles = self.vehicles.write().await;
        match vehicles.get_mut(id) {
            Some(vehicle) => vehicle.set_status(status),
            None => NotFoundSnafu {
                entity: "vehicle",
                id: id.to_string(),
            }
            .fail(),
        }
    }
}

#[async_trait]
impl AlertStorage for MemStorage {
    async fn add_alert(&self, alert: &Alert) -> CoreResult<()> {
        self.alerts.write().await.insert(alert.id, alert.clone());
        Ok(())
    }

    async fn alert(&self, id: AlertId) -> CoreResult<Option<Alert>> {
        Ok(self.alerts.read().await.get(&id).cloned())
    }

    async fn update_alert(&self, alert: &Alert) -> CoreResult<()> {
        let mut alerts = self.alerts.write().await;
        match alerts.get_mut(&alert.id) {
            Some(stored) => {
                *stored = alert.clone();
                Ok(())
            }
            None => NotFoundSnafu {
                entity: "alert",
                id: alert.id.to_string(),
            }
            .fail(),
        }
    }

    async fn alerts(&self, query: &AlertsQuery) -> CoreResult<AlertsPage> {
        let alerts = self.alerts.read().await;

        let mut matching: Vec<Alert> = alerts
            .values()
            .filter(|a| query.matches(a))
            .cloned()
            .collect();

        match query.ordering() {
            Ordering::Asc => matching.sort_by_key(|a| a.created_at),
            Ordering::Desc => {
                matching.sort_by_key(|a| a.created_at);
                matching.reverse();
            }
        }

        let total = matching.len();
        let pagination = query.pagination;
        let page: Vec<Alert> = matching
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.limit as usize)
            .collect();

        Ok(AlertsPage {
            alerts: page,
            total,
            page: pagination.page,
            pages: pagination.pages(total),
        })
    }
}
