/// Integration tests for the alert feed and stored alert actions

use axum::http::StatusCode;
use huddlebooks::models::{Alert, Severity};
use huddlebooks::repo;

mod common;
use common::*;

#[tokio::test]
async fn test_feed_synthesizes_from_transactions() {
    let (mut app, pool) = create_test_app();
    let association = onboard_association(&mut app, "Harbour FC").await;
    let association_id = association["id"].as_str().unwrap().to_string();
    let (team, _, category) = seed_team(&pool, &association_id);

    create_transaction(&mut app, &team.get_id(), &category.get_id(), 314.0, "Bus Charter Co").await;

    let (status, feed) = send_json(
        &mut app,
        "GET",
        &format!("/associations/{}/alerts", association_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = feed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["alert_type"], "PENDING_APPROVAL");
    assert_eq!(entries[0]["severity"], "MEDIUM");
    assert_eq!(entries[0]["title"], "Pending approval for Bus Charter Co - $314.00");
    assert_eq!(entries[0]["team_name"], "U13 AA");
}

#[tokio::test]
async fn test_feed_includes_overspend_from_snapshot() {
    let (mut app, pool) = create_test_app();
    let association = onboard_association(&mut app, "Harbour FC").await;
    let association_id = association["id"].as_str().unwrap().to_string();
    let (team, at, category) = seed_team(&pool, &association_id);

    // Spend 105% of the 50k budget, approved
    let txn =
        create_transaction(&mut app, &team.get_id(), &category.get_id(), 52_500.0, "Arena").await;
    send_json(
        &mut app,
        "POST",
        &format!("/transactions/{}/approve", txn["id"].as_str().unwrap()),
        None,
    )
    .await;
    send_json(
        &mut app,
        "POST",
        &format!("/associations/{}/teams/{}/snapshots", association_id, at.get_id()),
        None,
    )
    .await;

    let (status, feed) = send_json(
        &mut app,
        "GET",
        &format!("/associations/{}/alerts", association_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = feed.as_array().unwrap();
    let overspends: Vec<_> = entries
        .iter()
        .filter(|e| e["alert_type"] == "OVERSPEND")
        .collect();
    assert_eq!(overspends.len(), 1);
    assert_eq!(overspends[0]["title"], "Budget exceeded by 5.0%");
    assert_eq!(overspends[0]["severity"], "HIGH");
}

#[tokio::test]
async fn test_resolve_and_acknowledge_stored_alert() {
    let (mut app, pool) = create_test_app();
    let association = onboard_association(&mut app, "Harbour FC").await;
    let association_id = association["id"].as_str().unwrap().to_string();

    let alert = Alert::new(
        &association_id,
        None,
        "BANK_DISCONNECTED".to_string(),
        "Bank connection lost".to_string(),
        Severity::High,
    );
    repo::create_alert(&pool, &alert).unwrap();

    let (status, acked) = send_json(
        &mut app,
        "POST",
        &format!("/associations/{}/alerts/{}/acknowledge", association_id, alert.get_id()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(acked["acknowledged_at"].is_string());

    let (status, resolved) = send_json(
        &mut app,
        "POST",
        &format!("/associations/{}/alerts/{}/resolve", association_id, alert.get_id()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(resolved["resolved_at"].is_string());

    // Resolved alerts drop out of the feed
    let (_, feed) = send_json(
        &mut app,
        "GET",
        &format!("/associations/{}/alerts", association_id),
        None,
    )
    .await;
    assert!(feed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_alert_actions_are_tenant_scoped() {
    let (mut app, pool) = create_test_app();
    let association = onboard_association(&mut app, "Harbour FC").await;
    let other = onboard_association(&mut app, "Rival FC").await;
    let association_id = association["id"].as_str().unwrap().to_string();

    let alert = Alert::new(
        &association_id,
        None,
        "BANK_DISCONNECTED".to_string(),
        "Bank connection lost".to_string(),
        Severity::High,
    );
    repo::create_alert(&pool, &alert).unwrap();

    let (status, _) = send_json(
        &mut app,
        "POST",
        &format!(
            "/associations/{}/alerts/{}/resolve",
            other["id"].as_str().unwrap(),
            alert.get_id()
        ),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
