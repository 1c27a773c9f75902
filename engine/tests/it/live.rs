use std::time::Duration;

use fleet_core::{AlertSeverity, AlertType, Coordinates, Event, NewAlert, VehicleId};

use crate::helper::{TestHelper, line_route, recv_event};

fn new_alert(severity: AlertSeverity, asset: &str) -> NewAlert {
    NewAlert {
        alert_type: AlertType::System,
        severity,
        message: "incident".to_string(),
        affected_asset: asset.to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn malformed_input_yields_an_error_event() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let (session, mut events) = helper.live_client();

    session.handle_message("not json at all").await;
    match recv_event(&mut events).await {
        Event::Error { message } => assert_eq!(message, "invalid message format"),
        other => panic!("unexpected event: {other:?}"),
    }

    session.handle_message(r#"{"type":"bogus"}"#).await;
    match recv_event(&mut events).await {
        Event::Error { message } => assert_eq!(message, "unknown message type"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn subscribed_clients_receive_matching_events_only() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let (session, mut events) = helper.live_client();

    session
        .handle_message(r#"{"type":"subscribe","filter":{"severities":["high"]}}"#)
        .await;

    helper
        .alerts
        .create(new_alert(AlertSeverity::Low, "T1"))
        .await
        .unwrap();
    helper
        .alerts
        .create(new_alert(AlertSeverity::High, "T1"))
        .await
        .unwrap();

    match recv_event(&mut events).await {
        Event::Alert { data } => assert_eq!(data.severity, AlertSeverity::High),
        other => panic!("unexpected event: {other:?}"),
    }

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn resubscribing_replaces_the_filter() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let (session, mut events) = helper.live_client();

    session
        .handle_message(r#"{"type":"subscribe","filter":{"assets":["T2"]}}"#)
        .await;
    session.handle_message(r#"{"type":"subscribe"}"#).await;

    helper
        .alerts
        .create(new_alert(AlertSeverity::Low, "T1"))
        .await
        .unwrap();

    assert!(matches!(recv_event(&mut events).await, Event::Alert { .. }));
}

#[tokio::test(start_paused = true)]
async fn unsubscribing_stops_delivery() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let (session, mut events) = helper.live_client();

    session.handle_message(r#"{"type":"subscribe"}"#).await;
    helper
        .alerts
        .create(new_alert(AlertSeverity::Low, "T1"))
        .await
        .unwrap();
    assert!(matches!(recv_event(&mut events).await, Event::Alert { .. }));

    session.handle_message(r#"{"type":"unsubscribe"}"#).await;
    helper
        .alerts
        .create(new_alert(AlertSeverity::Low, "T1"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn closing_the_session_unsubscribes() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let (session, mut events) = helper.live_client();

    session.handle_message(r#"{"type":"subscribe"}"#).await;
    session.close().await;

    helper
        .alerts
        .create(new_alert(AlertSeverity::Low, "T1"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn route_progress_is_answered_directly() {
    let helper = TestHelper::new(line_route(5, 10_000.0));
    helper.add_truck("T1").await;
    helper
        .registry
        .start_tracking(
            &VehicleId::new("T1"),
            Coordinates::new(0.0, 0.0),
            Coordinates::new(0.0, 0.004),
        )
        .await
        .unwrap();

    let (session, mut events) = helper.live_client();
    session
        .handle_message(r#"{"type":"get_route_progress","vehicleId":"T1","vehicleType":"truck"}"#)
        .await;

    match recv_event(&mut events).await {
        Event::RouteProgress { vehicle_id, data } => {
            assert_eq!(vehicle_id, VehicleId::new("T1"));
            assert_eq!(data.total_duration, 10_000.0);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn route_progress_for_untracked_vehicles_is_an_error_event() {
    let helper = TestHelper::new(line_route(2, 100.0));
    let (session, mut events) = helper.live_client();

    session
        .handle_message(r#"{"type":"get_route_progress","vehicleId":"T9"}"#)
        .await;

    match recv_event(&mut events).await {
        Event::Error { message } => {
            assert_eq!(message, "vehicle 'T9' is not tracked");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}
