use std::{convert::Infallible, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::{Coordinates, CoreResult, core_error::ValidationSnafu};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for VehicleId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for VehicleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum VehicleKind {
    Truck,
    Ship,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TruckStatus {
    Available,
    EnRoute,
    Maintenance,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShipStatus {
    AtDock,
    Sailing,
    Maintenance,
    Delayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleStatus {
    Truck(TruckStatus),
    Ship(ShipStatus),
}

impl Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleStatus::Truck(s) => s.fmt(f),
            VehicleStatus::Ship(s) => s.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockingSchedule {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub dock_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Truck {
    pub id: VehicleId,
    pub status: TruckStatus,
    pub position: Coordinates,
    pub capacity: f64,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub id: VehicleId,
    pub name: String,
    pub status: ShipStatus,
    pub position: Coordinates,
    pub capacity: f64,
    pub speed_over_ground: Option<f64>,
    pub docking_schedule: Option<DockingSchedule>,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum Vehicle {
    Truck(Truck),
    Ship(Ship),
}

impl Vehicle {
    pub fn id(&self) -> &VehicleId {
        match self {
            Vehicle::Truck(t) => &t.id,
            Vehicle::Ship(s) => &s.id,
        }
    }

    pub fn kind(&self) -> VehicleKind {
        match self {
            Vehicle::Truck(_) => VehicleKind::Truck,
            Vehicle::Ship(_) => VehicleKind::Ship,
        }
    }

    /// Human readable name used in alert messages, ships are referred
    /// to by their registered name.
    pub fn display_name(&self) -> &str {
        match self {
            Vehicle::Truck(t) => t.id.as_ref(),
            Vehicle::Ship(s) => &s.name,
        }
    }

    pub fn position(&self) -> Coordinates {
        match self {
            Vehicle::Truck(t) => t.position,
            Vehicle::Ship(s) => s.position,
        }
    }

    pub fn status(&self) -> VehicleStatus {
        match self {
            Vehicle::Truck(t) => VehicleStatus::Truck(t.status),
            Vehicle::Ship(s) => VehicleStatus::Ship(s.status),
        }
    }

    /// The status a vehicle assumes when it reaches the final waypoint
    /// of its route.
    pub fn arrived_status(&self) -> VehicleStatus {
        match self {
            Vehicle::Truck(_) => VehicleStatus::Truck(TruckStatus::Available),
            Vehicle::Ship(_) => VehicleStatus::Ship(ShipStatus::AtDock),
        }
    }

    pub fn set_position(&mut self, position: Coordinates, timestamp: DateTime<Utc>) {
        match self {
            Vehicle::Truck(t) => {
                t.position = position;
                t.last_update = timestamp;
            }
            Vehicle::Ship(s) => {
                s.position = position;
                s.last_update = timestamp;
            }
        }
    }

    pub fn set_status(&mut self, status: VehicleStatus) -> CoreResult<()> {
        match (self, status) {
            (Vehicle::Truck(t), VehicleStatus::Truck(status)) => {
                t.status = status;
                Ok(())
            }
            (Vehicle::Ship(s), VehicleStatus::Ship(status)) => {
                s.status = status;
                Ok(())
            }
            (vehicle, status) => ValidationSnafu {
                reason: format!(
                    "status '{status}' is not applicable to {} '{}'",
                    vehicle.kind().as_ref().to_lowercase(),
                    vehicle.id(),
                ),
            }
            .fail(),
        }
    }
}

#[cfg(feature = "test")]
mod test {
    use chrono::Utc;

    use super::*;

    impl Truck {
        pub fn test_default(id: &str) -> Truck {
            Truck {
                id: VehicleId::new(id),
                status: TruckStatus::EnRoute,
                position: Coordinates::new(0.0, 0.0),
                capacity: 24_000.0,
                last_update: Utc::now(),
            }
        }
    }

    impl Ship {
        pub fn test_default(id: &str) -> Ship {
            Ship {
                id: VehicleId::new(id),
                name: format!("test_ship_{id}"),
                status: ShipStatus::Sailing,
                position: Coordinates::new(0.0, 0.0),
                capacity: 5_000.0,
                speed_over_ground: Some(12.5),
                docking_schedule: None,
                last_update: Utc::now(),
            }
        }
    }
}
