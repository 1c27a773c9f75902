use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{Alert, AlertSeverity, AlertStatus, AlertType};

mod pagination;

pub use pagination::*;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum Ordering {
    #[serde(alias = "asc", alias = "Asc", alias = "ascending", alias = "Ascending")]
    Asc = 1,
    #[serde(
        alias = "desc",
        alias = "Desc",
        alias = "Descending",
        alias = "descending"
    )]
    Desc = 2,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertsQuery {
    pub status: Option<AlertStatus>,
    pub severity: Option<AlertSeverity>,
    pub alert_type: Option<AlertType>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    /// Ordering on creation time, newest first when unset.
    pub ordering: Option<Ordering>,
    pub pagination: Pagination,
}

impl AlertsQuery {
    pub fn matches(&self, alert: &Alert) -> bool {
        self.status.is_none_or(|s| alert.status == s)
            && self.severity.is_none_or(|s| alert.severity == s)
            && self.alert_type.is_none_or(|t| alert.alert_type == t)
            && self.created_after.is_none_or(|t| alert.created_at >= t)
            && self.created_before.is_none_or(|t| alert.created_at <= t)
    }

    pub fn ordering(&self) -> Ordering {
        self.ordering.unwrap_or(Ordering::Desc)
    }
}

#[derive(Debug, Clone)]
pub struct AlertsPage {
    pub alerts: Vec<Alert>,
    pub total: usize,
    pub page: u32,
    pub pages: u32,
}
