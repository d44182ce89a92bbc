use crate::db::{self, DbPool};
use crate::models::{HealthStatus, Severity, TransactionStatus};
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use proptest::prelude::*;
use std::sync::Arc;

/// Sets up a test database with migrations applied
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to an in-memory database
pub fn setup_test_db() -> Arc<DbPool> {
    // Use a unique shared in-memory database for each test.
    // Plain ":memory:" gives each connection its own separate database,
    // so migrations run on one connection wouldn't be visible on others.
    // By using a unique URI with cache=shared, all connections in this pool
    // share the same in-memory database while remaining isolated from other tests.
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url);

    let mut conn = pool.get().expect("Failed to get connection");

    // Enable foreign key constraints for SQLite
    conn.batch_execute("PRAGMA foreign_keys = ON").unwrap();

    crate::run_migrations(&mut conn);

    Arc::new(pool)
}

/// Generates an arbitrary DateTime<Utc> within 2020-01-01 to 2030-01-01
pub fn arb_datetime_utc() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64).prop_map(|ts| DateTime::from_timestamp(ts, 0).unwrap())
}

/// Generates an optional arbitrary DateTime<Utc>
pub fn arb_optional_datetime_utc() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    prop_oneof![Just(None), arb_datetime_utc().prop_map(Some)]
}

/// Generates a budget utilization percentage in [0, 200]
///
/// Uses integer-then-divide so exact boundary values like 90.0 and 100.0
/// are reachable without floating point boundary issues.
pub fn arb_percent_used() -> impl Strategy<Value = f64> {
    (0u32..=2000u32).prop_map(|v| f64::from(v) / 10.0)
}

/// Generates a positive dollar amount up to $10,000 in whole cents
pub fn arb_amount() -> impl Strategy<Value = f64> {
    (1u32..=1_000_000u32).prop_map(|cents| f64::from(cents) / 100.0)
}

/// Generates an arbitrary Severity
pub fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![Just(Severity::Low), Just(Severity::Medium), Just(Severity::High)]
}

/// Generates an arbitrary HealthStatus
pub fn arb_health_status() -> impl Strategy<Value = HealthStatus> {
    prop_oneof![
        Just(HealthStatus::Healthy),
        Just(HealthStatus::NeedsAttention),
        Just(HealthStatus::AtRisk),
    ]
}

/// Generates an arbitrary TransactionStatus
pub fn arb_transaction_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Approved),
        Just(TransactionStatus::Rejected),
    ]
}

use diesel::RunQueryDsl;
use diesel::sql_types::Text;

#[derive(diesel::QueryableByName, Debug)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Verifies that migrations create every expected table and that the app
/// comes up against the test database
#[tokio::test]
async fn test_setup_test_db() {
    let pool = setup_test_db();
    assert!(pool.get().is_ok());

    let mut conn = pool.get().unwrap();
    let table_names: Vec<TableName> =
        diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
            .load(&mut conn)
            .expect("Failed to load table names");

    let expected_tables = vec![
        "associations",
        "dashboard_configs",
        "association_users",
        "teams",
        "association_teams",
        "team_snapshots",
        "categories",
        "budget_allocations",
        "transactions",
        "alerts",
        "association_rules",
        "__diesel_schema_migrations",
    ];

    for table in expected_tables {
        let exists = table_names.iter().any(|t| t.name == table);
        assert!(exists, "Table '{}' not found in database", table);

        let query = format!("SELECT COUNT(*) FROM {}", table);
        let result = diesel::sql_query(&query).execute(&mut conn);
        assert!(result.is_ok(), "Failed to query table '{}': {:?}", table, result.err());
    }
}
