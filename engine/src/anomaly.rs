use chrono::{DateTime, Utc};
use fleet_core::{
    AlertSeverity, AlertType, NewAlert, ShipStatus, TrackingSession, Vehicle, VehicleStatus,
    haversine_km,
};

/// Progress deficit (as a share of the route) before a vehicle counts
/// as delayed.
const DELAY_PROGRESS_SLACK: f64 = 0.2;
/// Distance in kilometers between expected and reported position
/// before it counts as a route deviation.
const DEVIATION_LIMIT_KM: f64 = 0.5;
/// Speed in knots below which a sailing ship counts as stopped.
const STOPPED_SPEED_KNOTS: f64 = 0.1;
/// Allowed deviation in hours from a scheduled docking time.
const DOCK_SCHEDULE_SLACK_HOURS: f64 = 2.0;

/// Stateless per-tick anomaly checks. Every rule whose condition holds
/// yields one alert, a tick can produce several.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyDetector;

impl AnomalyDetector {
    pub fn detect(
        &self,
        session: &TrackingSession,
        vehicle: &Vehicle,
        previous_status: Option<VehicleStatus>,
        now: DateTime<Utc>,
    ) -> Vec<NewAlert> {
        let mut alerts = Vec::new();
        let kind = vehicle.kind();
        let asset = vehicle.id().to_string();

        let expected_progress = session.elapsed_seconds(now) / session.route.duration_seconds;
        if session.progress() < expected_progress - DELAY_PROGRESS_SLACK {
            alerts.push(NewAlert {
                alert_type: AlertType::delay_for(kind),
                severity: AlertSeverity::High,
                message: format!(
                    "{} {} is significantly behind schedule",
                    kind.as_ref(),
                    vehicle.display_name()
                ),
                affected_asset: asset.clone(),
            });
        }

        // The first waypoint is the starting position, trivially close.
        if session.current_step > 0 {
            if let Some(expected) = session.expected_waypoint() {
                if haversine_km(expected, vehicle.position()) > DEVIATION_LIMIT_KM {
                    alerts.push(NewAlert {
                        alert_type: AlertType::RouteDeviation,
                        severity: AlertSeverity::Medium,
                        message: format!(
                            "{} {} has deviated from planned route",
                            kind.as_ref(),
                            vehicle.display_name()
                        ),
                        affected_asset: asset.clone(),
                    });
                }
            }
        }

        if let Vehicle::Ship(ship) = vehicle {
            if ship.status == ShipStatus::Sailing
                && ship.speed_over_ground.is_some_and(|sog| sog < STOPPED_SPEED_KNOTS)
            {
                alerts.push(NewAlert {
                    alert_type: AlertType::ShipStopped,
                    severity: AlertSeverity::Medium,
                    message: format!("Ship {} has unexpectedly stopped while sailing", ship.name),
                    affected_asset: asset.clone(),
                });
            }

            if let Some(schedule) = &ship.docking_schedule {
                let hours_off = (now - schedule.start_time).num_milliseconds().abs() as f64
                    / 3_600_000.0;
                if hours_off > DOCK_SCHEDULE_SLACK_HOURS {
                    alerts.push(NewAlert {
                        alert_type: AlertType::DockSchedule,
                        severity: AlertSeverity::High,
                        message: format!(
                            "Ship {} is {} hours off schedule",
                            ship.name,
                            hours_off.round()
                        ),
                        affected_asset: asset.clone(),
                    });
                }
            }
        }

        if let Some(previous) = previous_status {
            let current = vehicle.status();
            if previous != current {
                alerts.push(NewAlert {
                    alert_type: AlertType::StatusChange,
                    severity: AlertSeverity::Medium,
                    message: format!(
                        "{} {} status changed from {previous} to {current}",
                        kind.as_ref(),
                        vehicle.display_name()
                    ),
                    affected_asset: asset,
                });
            }
        }

        alerts
    }
}
