use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Alert, AlertSeverity, AlertType, Coordinates, RouteProgress, VehicleId, VehicleKind};

/// Outbound live-channel message, also the unit of broker fan-out.
/// `error` is only ever sent directly to a single client, never
/// published through the broker.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "position_update")]
    PositionUpdate {
        #[serde(rename = "vehicleId")]
        vehicle_id: VehicleId,
        location: Coordinates,
    },
    #[serde(rename = "alert")]
    Alert { data: Alert },
    #[serde(rename = "alertUpdated")]
    AlertUpdated { data: Alert },
    #[serde(rename = "route_progress")]
    RouteProgress {
        #[serde(rename = "vehicleId")]
        vehicle_id: VehicleId,
        data: RouteProgress,
    },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Inbound live-channel control message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe {
        #[serde(default)]
        filter: SubscriptionFilter,
    },
    Unsubscribe,
    GetRouteProgress {
        #[serde(rename = "vehicleId")]
        vehicle_id: VehicleId,
        #[serde(rename = "vehicleType")]
        vehicle_type: Option<VehicleKind>,
    },
}

/// Per-client match criteria. An empty set on a dimension matches
/// everything on that dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriptionFilter {
    pub vehicle_ids: HashSet<VehicleId>,
    pub alert_types: HashSet<AlertType>,
    pub severities: HashSet<AlertSeverity>,
    pub assets: HashSet<String>,
}

impl SubscriptionFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match event {
            Event::PositionUpdate { vehicle_id, .. } | Event::RouteProgress { vehicle_id, .. } => {
                self.vehicle_ids.is_empty() || self.vehicle_ids.contains(vehicle_id)
            }
            Event::Alert { data } | Event::AlertUpdated { data } => {
                (self.alert_types.is_empty() || self.alert_types.contains(&data.alert_type))
                    && (self.severities.is_empty() || self.severities.contains(&data.severity))
                    && (self.assets.is_empty() || self.assets.contains(&data.affected_asset))
            }
            Event::Error { .. } => true,
        }
    }
}
