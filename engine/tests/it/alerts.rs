use std::time::Duration;

use fleet_core::{
    AlertId, AlertSeverity, AlertStatus, AlertType, AlertsQuery, Error, Event, NewAlert,
    Pagination,
};

use crate::helper::{TestHelper, line_route, recv_event};

fn new_alert(message: &str, asset: &str) -> NewAlert {
    NewAlert {
        alert_type: AlertType::System,
        severity: AlertSeverity::Low,
        message: message.to_string(),
        affected_asset: asset.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn created_alerts_are_stored_open_and_published() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let mut events = helper.subscribe_all().await;

    let alert = helper
        .alerts
        .create(new_alert("disk almost full", "engine-host"))
        .await
        .unwrap();
    assert_eq!(alert.status, AlertStatus::Open);

    match recv_event(&mut events).await {
        Event::Alert { data } => assert_eq!(data.id, alert.id),
        other => panic!("unexpected event: {other:?}"),
    }

    let page = helper.alerts.alerts(&AlertsQuery::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.alerts[0].message, "disk almost full");
}

#[tokio::test(start_paused = true)]
async fn blank_fields_are_rejected() {
    let helper = TestHelper::new(line_route(2, 100.0));

    let error = helper.alerts.create(new_alert("  ", "T1")).await.unwrap_err();
    assert!(matches!(error, Error::Validation { .. }));

    let error = helper
        .alerts
        .create(new_alert("something happened", ""))
        .await
        .unwrap_err();
    assert!(matches!(error, Error::Validation { .. }));

    assert_eq!(
        helper
            .alerts
            .alerts(&AlertsQuery::default())
            .await
            .unwrap()
            .total,
        0
    );
}

#[tokio::test(start_paused = true)]
async fn acknowledgements_are_persisted_and_announced() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let mut events = helper.subscribe_all().await;

    let alert = helper
        .alerts
        .create(new_alert("latency spike", "T1"))
        .await
        .unwrap();
    recv_event(&mut events).await;

    let acknowledged = helper.alerts.acknowledge(alert.id, "U1").await.unwrap();
    assert_eq!(acknowledged.status, AlertStatus::Acknowledged);
    assert_eq!(acknowledged.acknowledged_by.as_deref(), Some("U1"));

    match recv_event(&mut events).await {
        Event::AlertUpdated { data } => {
            assert_eq!(data.id, alert.id);
            assert_eq!(data.status, AlertStatus::Acknowledged);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let stored = helper.alerts.alert(alert.id).await.unwrap();
    assert_eq!(stored.status, AlertStatus::Acknowledged);
}

#[tokio::test(start_paused = true)]
async fn resolution_closes_the_alert_and_records_a_note() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let mut events = helper.subscribe_all().await;

    let alert = helper
        .alerts
        .create(new_alert("latency spike", "T1"))
        .await
        .unwrap();
    recv_event(&mut events).await;

    let resolved = helper
        .alerts
        .resolve(alert.id, "U1", "restarted the probe")
        .await
        .unwrap();
    assert_eq!(resolved.status, AlertStatus::Resolved);
    assert_eq!(resolved.notes.len(), 1);
    assert_eq!(resolved.notes[0].text, "Resolution: restarted the probe");

    match recv_event(&mut events).await {
        Event::AlertUpdated { data } => assert_eq!(data.status, AlertStatus::Resolved),
        other => panic!("unexpected event: {other:?}"),
    }

    let error = helper
        .alerts
        .resolve(alert.id, "U1", "again")
        .await
        .unwrap_err();
    assert!(matches!(error, Error::Conflict { .. }));
}

#[tokio::test(start_paused = true)]
async fn notes_are_persisted_without_an_announcement() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let mut events = helper.subscribe_all().await;

    let alert = helper
        .alerts
        .create(new_alert("latency spike", "T1"))
        .await
        .unwrap();
    recv_event(&mut events).await;

    let updated = helper
        .alerts
        .add_note(alert.id, "U1", "looking into it")
        .await
        .unwrap();
    assert_eq!(updated.notes.len(), 1);
    assert_eq!(updated.status, AlertStatus::Open);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn unknown_alert_ids_are_not_found() {
    let helper = TestHelper::new(line_route(2, 100.0));

    let id: AlertId = "00000000-0000-0000-0000-000000000000".parse().unwrap();
    assert!(matches!(
        helper.alerts.acknowledge(id, "U1").await.unwrap_err(),
        Error::NotFound { .. }
    ));
    assert!(matches!(
        helper.alerts.resolve(id, "U1", "gone").await.unwrap_err(),
        Error::NotFound { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn alert_listing_filters_and_paginates() {
    let helper = TestHelper::new(line_route(2, 100.0));

    for i in 0..12 {
        let severity = if i < 3 {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Low
        };
        helper
            .alerts
            .create(NewAlert {
                alert_type: AlertType::System,
                severity,
                message: format!("incident {i}"),
                affected_asset: "engine-host".to_string(),
            })
            .await
            .unwrap();
    }

    let page = helper.alerts.alerts(&AlertsQuery::default()).await.unwrap();
    assert_eq!(page.total, 12);
    assert_eq!(page.pages, 2);
    assert_eq!(page.alerts.len(), 10);

    let critical = helper
        .alerts
        .alerts(&AlertsQuery {
            severity: Some(AlertSeverity::Critical),
            pagination: Pagination::new(1, 2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(critical.total, 3);
    assert_eq!(critical.pages, 2);
    assert_eq!(critical.alerts.len(), 2);
}
