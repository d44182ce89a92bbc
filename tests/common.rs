/// Common test utilities for HuddleBooks integration tests
///
/// Shared setup for all integration tests: an app over a fresh in-memory
/// database, request helpers, and seed functions for the entities that have
/// no public creation endpoint (teams, categories, allocations).

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode},
};
use huddlebooks::{
    create_app,
    db::{DbPool, init_pool},
    models::{AssociationTeam, Category, Team, TransactionKind},
    repo, run_migrations,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::Service;

/// Creates a test application backed by a unique in-memory SQLite database
///
/// The pool is returned alongside the app so tests can seed entities that
/// have no HTTP creation endpoint.
pub fn create_test_app() -> (Router, Arc<DbPool>) {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = Arc::new(init_pool(&database_url));

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn);
    drop(conn);

    (create_app(pool.clone()), pool)
}

/// Sends a request with an optional JSON body and returns the raw response
pub async fn send(
    app: &mut Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Response<axum::body::Body> {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.call(request).await.unwrap()
}

/// Sends a request and parses the response body as JSON
pub async fn send_json(
    app: &mut Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send(app, method, uri, body).await;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Onboards an association through the API and returns its JSON
pub async fn onboard_association(app: &mut Router, name: &str) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/associations",
        Some(json!({
            "name": name,
            "admin_email": "admin@example.com",
            "admin_name": "Alex Admin",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "onboarding failed: {:?}", body);
    body
}

/// Seeds a team, its association membership, and one expense category
pub fn seed_team(pool: &DbPool, association_id: &str) -> (Team, AssociationTeam, Category) {
    let team = Team::new("U13 AA".to_string(), "AA".to_string(), "2025-26".to_string(), 50_000.0);
    repo::create_team(pool, &team).unwrap();

    let at = AssociationTeam::new(association_id, Some(team.get_id()), "U13 AA".to_string());
    repo::create_association_team(pool, &at).unwrap();

    let category = Category::new(
        association_id,
        "Ice Rental".to_string(),
        "Facilities".to_string(),
        "#1d4ed8".to_string(),
        TransactionKind::Expense,
    );
    repo::create_category(pool, &category).unwrap();

    (team, at, category)
}

/// Creates a transaction through the API and returns its JSON
pub async fn create_transaction(
    app: &mut Router,
    team_id: &str,
    category_id: &str,
    amount: f64,
    vendor: &str,
) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        &format!("/teams/{}/transactions", team_id),
        Some(json!({
            "category_id": category_id,
            "amount": amount,
            "vendor": vendor,
            "creator_email": "treasurer@example.com",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "transaction create failed: {:?}", body);
    body
}
