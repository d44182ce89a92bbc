/// HuddleBooks: Association Financial Oversight Library
///
/// This library provides the core functionality for a multi-tenant financial
/// oversight backend for youth sports associations: team budgets, transaction
/// review, receipt compliance, governance rules, health snapshots, a
/// synthesized alert feed, and CSV reporting.
///
/// ### Modules
///
/// - `db`: Database connection management
/// - `models`: Data structures mapping to database tables
/// - `repo`: Repository layer for database operations
/// - `schema`: Database schema definitions
/// - `alerts`: Alert feed aggregation
/// - `health`: Snapshot health computation
/// - `reports`: Report shaping and CSV export
/// - `handlers`: Axum request handlers
/// - `config`: Layered configuration
///
/// ### Web API
///
/// The library exposes a RESTful API using Axum. Associations are the
/// tenants; every association-scoped route validates the tenant first and
/// returns 404 for an unknown one.

/// Database connection module
pub mod db;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Alert feed aggregation
pub mod alerts;

/// Snapshot health computation
pub mod health;

/// Report shaping and CSV export
pub mod reports;

/// Request/response DTOs
pub mod dto;

/// Axum request handlers
pub mod handlers;

/// API error type
pub mod errors;

/// Layered configuration
pub mod config;

#[cfg(test)]
pub mod test_utils;

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use errors::ApiError;
use handlers::*;

/// Creates the application router with all routes
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the database pool as state
pub fn create_app(pool: Arc<db::DbPool>) -> Router {
    Router::new()
        // Onboarding
        .route("/associations", post(onboard_association_handler))
        // Dashboards
        .route("/associations/{id}/overview", get(overview_handler))
        .route("/associations/{id}/alerts", get(alert_feed_handler))
        .route(
            "/associations/{id}/alerts/{alert_id}/resolve",
            post(resolve_alert_handler),
        )
        .route(
            "/associations/{id}/alerts/{alert_id}/acknowledge",
            post(acknowledge_alert_handler),
        )
        .route("/associations/{id}/teams/{team_id}", get(team_detail_handler))
        .route(
            "/associations/{id}/teams/{team_id}/snapshots",
            post(run_snapshot_handler).get(snapshot_history_handler),
        )
        // Reports
        .route("/associations/{id}/reports", get(reports_handler))
        .route("/associations/{id}/reports/season.csv", get(season_csv_handler))
        .route(
            "/associations/{id}/reports/transactions.csv",
            get(transactions_csv_handler),
        )
        .route("/associations/{id}/reports/alerts.csv", get(alerts_csv_handler))
        // Settings
        .route("/associations/{id}/settings", get(settings_handler))
        .route("/associations/{id}", put(update_association_handler))
        .route("/association_users/{id}/role", put(update_user_role_handler))
        .route(
            "/associations/{id}/receipt-policy",
            get(get_receipt_policy_handler).put(update_receipt_policy_handler),
        )
        // Governance rules
        .route(
            "/associations/{id}/rules",
            get(list_rules_handler).post(create_rule_handler),
        )
        .route(
            "/associations/{id}/rules/{rule_id}",
            get(get_rule_handler)
                .put(update_rule_handler)
                .delete(delete_rule_handler),
        )
        .route(
            "/associations/{id}/rules/{rule_id}/active",
            put(set_rule_active_handler),
        )
        // Transactions
        .route(
            "/teams/{team_id}/transactions",
            post(create_transaction_handler).get(list_transactions_handler),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction_handler)
                .put(update_transaction_handler)
                .delete(delete_transaction_handler),
        )
        .route("/transactions/{id}/approve", post(approve_transaction_handler))
        .route("/transactions/{id}/reject", post(reject_transaction_handler))
        .layer(CorsLayer::permissive())
        .with_state(pool)
}

/// Runs the embedded migrations
///
/// ### Panics
///
/// This function will panic if the migrations fail to run
pub fn run_migrations(conn: &mut diesel::SqliteConnection) {
    use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_tenant_is_404() {
        let pool = setup_test_db();
        let app = create_app(pool);

        let request = Request::builder()
            .uri("/associations/not-a-tenant/overview")
            .method("GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let pool = setup_test_db();
        let app = create_app(pool);

        let request = Request::builder()
            .uri("/nope")
            .method("GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
