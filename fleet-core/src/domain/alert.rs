use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::{CoreResult, VehicleKind, core_error::ConflictSnafu};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(Uuid);

impl AlertId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for AlertId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertType {
    TruckDelay,
    ShipDelay,
    RouteDeviation,
    ShipStopped,
    StatusChange,
    DockSchedule,
    System,
}

impl AlertType {
    /// The schedule-delay alert type for a given vehicle kind.
    pub fn delay_for(kind: VehicleKind) -> AlertType {
        match kind {
            VehicleKind::Truck => AlertType::TruckDelay,
            VehicleKind::Ship => AlertType::ShipDelay,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNote {
    pub text: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub affected_asset: String,
}

/// A persisted, lifecycle-managed record of an anomaly or system
/// condition. The status only ever advances forward along
/// open -> acknowledged -> resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub affected_asset: String,
    pub status: AlertStatus,
    pub notes: Vec<AlertNote>,
    pub created_at: DateTime<Utc>,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn new(new: NewAlert) -> Alert {
        let NewAlert {
            alert_type,
            severity,
            message,
            affected_asset,
        } = new;

        Alert {
            id: AlertId::new(),
            alert_type,
            severity,
            message,
            affected_asset,
            status: AlertStatus::Open,
            notes: Vec::new(),
            created_at: Utc::now(),
            acknowledged_by: None,
            acknowledged_at: None,
            resolved_by: None,
            resolved_at: None,
        }
    }

    /// Valid only from `open`.
    pub fn acknowledge(&mut self, user_id: &str) -> CoreResult<()> {
        match self.status {
            AlertStatus::Open => {
                self.status = AlertStatus::Acknowledged;
                self.acknowledged_by = Some(user_id.to_string());
                self.acknowledged_at = Some(Utc::now());
                Ok(())
            }
            status => ConflictSnafu {
                reason: format!("alert '{}' is {status}, only open alerts can be acknowledged", self.id),
            }
            .fail(),
        }
    }

    /// Valid from `open` or `acknowledged`; records the resolution as a
    /// note.
    pub fn resolve(&mut self, user_id: &str, resolution: &str) -> CoreResult<()> {
        match self.status {
            AlertStatus::Open | AlertStatus::Acknowledged => {
                self.status = AlertStatus::Resolved;
                self.resolved_by = Some(user_id.to_string());
                self.resolved_at = Some(Utc::now());
                self.add_note(user_id, format!("Resolution: {resolution}"));
                Ok(())
            }
            AlertStatus::Resolved => ConflictSnafu {
                reason: format!("alert '{}' is already resolved", self.id),
            }
            .fail(),
        }
    }

    pub fn add_note(&mut self, user_id: &str, text: impl Into<String>) {
        self.notes.push(AlertNote {
            text: text.into(),
            created_by: user_id.to_string(),
            created_at: Utc::now(),
        });
    }
}
