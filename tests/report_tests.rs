/// Integration tests for the reports payload and CSV exports

use axum::body::to_bytes;
use axum::http::StatusCode;
use huddlebooks::models::BudgetAllocation;
use huddlebooks::repo;

mod common;
use common::*;

async fn body_string(response: axum::http::Response<axum::body::Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_reports_payload() {
    let (mut app, pool) = create_test_app();
    let association = onboard_association(&mut app, "Harbour FC").await;
    let association_id = association["id"].as_str().unwrap().to_string();
    let (team, _, category) = seed_team(&pool, &association_id);

    let allocation =
        BudgetAllocation::new(&team.get_id(), &category.get_id(), "2025-26".to_string(), 12_000.0);
    repo::create_allocation(&pool, &allocation).unwrap();

    let txn = create_transaction(&mut app, &team.get_id(), &category.get_id(), 3_000.0, "Arena").await;
    send_json(
        &mut app,
        "POST",
        &format!("/transactions/{}/approve", txn["id"].as_str().unwrap()),
        None,
    )
    .await;
    create_transaction(&mut app, &team.get_id(), &category.get_id(), 500.0, "Pro Shop").await;

    let (status, reports) = send_json(
        &mut app,
        "GET",
        &format!("/associations/{}/reports", association_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let season = reports["season"].as_array().unwrap();
    assert_eq!(season.len(), 1);
    assert_eq!(season[0]["team_name"], "U13 AA");
    assert_eq!(season[0]["budget_total"], 50000.0);
    assert_eq!(season[0]["approved_spend"], 3000.0);
    assert_eq!(season[0]["pending_amount"], 500.0);
    assert_eq!(season[0]["remaining"], 47000.0);

    let transactions = reports["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["category"], "Ice Rental");

    // One pending transaction synthesizes one feed alert
    let alerts = reports["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "PENDING_APPROVAL");
}

#[tokio::test]
async fn test_season_csv_export() {
    let (mut app, pool) = create_test_app();
    let association = onboard_association(&mut app, "Harbour FC").await;
    let association_id = association["id"].as_str().unwrap().to_string();
    seed_team(&pool, &association_id);

    let response = send(
        &mut app,
        "GET",
        &format!("/associations/{}/reports/season.csv", association_id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );

    let csv = body_string(response).await;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Team,Division,Budget,Approved Spend,Pending,Remaining,Percent Used,Health"
    );
    assert!(lines.next().unwrap().starts_with("U13 AA,"));
}

#[tokio::test]
async fn test_transactions_csv_escapes_vendor_commas() {
    let (mut app, pool) = create_test_app();
    let association = onboard_association(&mut app, "Harbour FC").await;
    let association_id = association["id"].as_str().unwrap().to_string();
    let (team, _, category) = seed_team(&pool, &association_id);

    create_transaction(&mut app, &team.get_id(), &category.get_id(), 99.5, "Smith, Jones & Co")
        .await;

    let response = send(
        &mut app,
        "GET",
        &format!("/associations/{}/reports/transactions.csv", association_id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let csv = body_string(response).await;
    assert!(csv.contains("\"Smith, Jones & Co\""));
    assert!(csv.contains("PENDING,99.50,yes"));
}

#[tokio::test]
async fn test_alerts_csv_export() {
    let (mut app, pool) = create_test_app();
    let association = onboard_association(&mut app, "Harbour FC").await;
    let association_id = association["id"].as_str().unwrap().to_string();
    let (team, _, category) = seed_team(&pool, &association_id);

    create_transaction(&mut app, &team.get_id(), &category.get_id(), 42.0, "Pro Shop").await;

    let response = send(
        &mut app,
        "GET",
        &format!("/associations/{}/reports/alerts.csv", association_id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let csv = body_string(response).await;
    let mut lines = csv.lines();
    assert_eq!(lines.next().unwrap(), "Team,Type,Severity,Title,Created,Acknowledged");
    let row = lines.next().unwrap();
    assert!(row.contains("PENDING_APPROVAL"));
    assert!(row.contains("MEDIUM"));
}

#[tokio::test]
async fn test_reports_unknown_tenant_is_404() {
    let (mut app, _pool) = create_test_app();

    let response = send(&mut app, "GET", "/associations/nope/reports/season.csv", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
