use super::*;
use crate::models::{
    Alert, Association, AssociationRule, AssociationTeam, AssociationUser, BudgetAllocation,
    Category, DashboardConfig, HealthStatus, JsonValue, RuleType, Severity, Team, TeamSnapshot,
    Transaction, TransactionKind, TransactionStatus, UserRole,
};
use crate::test_utils::setup_test_db;
use chrono::{Duration, Utc};
use serde_json::json;

fn onboard(pool: &crate::db::DbPool) -> Association {
    let association = Association::new("Westside Minor Hockey".to_string(), "CAD".to_string());
    let admin = AssociationUser::new(
        &association.get_id(),
        "admin@wmha.example".to_string(),
        Some("Alex Moreau".to_string()),
        UserRole::AssociationAdmin,
    );
    let config = DashboardConfig::new(&association.get_id());
    onboard_association(pool, &association, &[admin], &config).unwrap();
    association
}

fn seed_team(pool: &crate::db::DbPool, association_id: &str) -> (Team, AssociationTeam, Category) {
    let team = Team::new("U13 AA".to_string(), "AA".to_string(), "2025-26".to_string(), 50_000.0);
    create_team(pool, &team).unwrap();

    let at = AssociationTeam::new(association_id, Some(team.get_id()), "U13 AA".to_string());
    create_association_team(pool, &at).unwrap();

    let category = Category::new(
        association_id,
        "Ice Rental".to_string(),
        "Facilities".to_string(),
        "#1d4ed8".to_string(),
        TransactionKind::Expense,
    );
    create_category(pool, &category).unwrap();

    (team, at, category)
}

fn seed_transaction(pool: &crate::db::DbPool, team: &Team, category: &Category, amount: f64) -> Transaction {
    let txn = Transaction::new(
        &team.get_id(),
        &category.get_id(),
        TransactionKind::Expense,
        amount,
        "Central Arena".to_string(),
        None,
        None,
        Some("Sam Tran".to_string()),
        "sam@wmha.example".to_string(),
        Utc::now(),
    );
    create_transaction(pool, &txn).unwrap();
    txn
}

#[test]
fn test_onboarding_creates_tenant_atomically() {
    let pool = setup_test_db();
    let association = onboard(&pool);

    let stored = get_association(&pool, &association.get_id()).unwrap().unwrap();
    assert_eq!(stored.get_name(), "Westside Minor Hockey");

    let users = list_users(&pool, &association.get_id()).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].get_role(), UserRole::AssociationAdmin);

    let config = get_dashboard_config(&pool, &association.get_id()).unwrap().unwrap();
    assert_eq!(config.get_budget_warning_pct(), 80.0);
}

#[test]
fn test_find_association_by_name() {
    let pool = setup_test_db();
    let association = onboard(&pool);

    let found = find_association_by_name(&pool, "Westside Minor Hockey").unwrap();
    assert_eq!(found.unwrap().get_id(), association.get_id());

    assert!(find_association_by_name(&pool, "Nonexistent").unwrap().is_none());
}

#[test]
fn test_update_association_partial_fields() {
    let pool = setup_test_db();
    let association = onboard(&pool);

    let changeset = AssociationChangeset {
        abbreviation: Some("WMHA".to_string()),
        season: Some("2025-26".to_string()),
        ..Default::default()
    };
    let updated = update_association(&pool, &association.get_id(), changeset).unwrap();

    assert_eq!(updated.get_abbreviation(), Some("WMHA".to_string()));
    assert_eq!(updated.get_season(), Some("2025-26".to_string()));
    // Untouched fields survive a partial update
    assert_eq!(updated.get_name(), "Westside Minor Hockey");
}

#[test]
fn test_update_association_missing_tenant_errors() {
    let pool = setup_test_db();
    let result = update_association(&pool, "missing", AssociationChangeset::default());
    assert!(result.is_err());
}

#[test]
fn test_receipt_policy_replaced_as_unit() {
    let pool = setup_test_db();
    let association = onboard(&pool);

    let policy = ReceiptPolicyChangeset {
        receipts_enabled: false,
        receipt_global_threshold_cents: 25_000,
        receipt_grace_period_days: 14,
        receipt_category_thresholds_enabled: true,
        receipt_category_overrides: JsonValue(json!({"cat-1": 5000})),
        allowed_team_threshold_override: true,
    };
    let updated = update_receipt_policy(&pool, &association.get_id(), policy).unwrap();

    assert!(!updated.get_receipts_enabled());
    assert_eq!(updated.get_receipt_global_threshold_cents(), 25_000);
    assert_eq!(updated.get_receipt_grace_period_days(), 14);
}

#[test]
fn test_association_team_tenant_scoping() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (_, at, _) = seed_team(&pool, &association.get_id());

    let found = get_association_team(&pool, &association.get_id(), &at.get_id()).unwrap();
    assert!(found.is_some());

    // A different tenant cannot address the row
    let cross = get_association_team(&pool, "other-association", &at.get_id()).unwrap();
    assert!(cross.is_none());
}

#[test]
fn test_transaction_review_lifecycle() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (team, _, category) = seed_team(&pool, &association.get_id());
    let txn = seed_transaction(&pool, &team, &category, 312.75);

    let approved = review_transaction(&pool, &txn.get_id(), TransactionStatus::Approved).unwrap();
    assert_eq!(approved.get_status(), TransactionStatus::Approved);

    // Reviewed transactions are terminal
    let again = review_transaction(&pool, &txn.get_id(), TransactionStatus::Rejected);
    assert!(again.is_err());
}

#[test]
fn test_transaction_listing_excludes_soft_deleted() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (team, _, category) = seed_team(&pool, &association.get_id());

    let keep = seed_transaction(&pool, &team, &category, 100.0);
    let gone = seed_transaction(&pool, &team, &category, 200.0);
    delete_transaction(&pool, &gone.get_id()).unwrap();

    let listed = list_team_transactions(&pool, &team.get_id(), None).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].get_id(), keep.get_id());

    assert!(get_transaction(&pool, &gone.get_id()).unwrap().is_none());
}

#[test]
fn test_transaction_status_filter() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (team, _, category) = seed_team(&pool, &association.get_id());

    let a = seed_transaction(&pool, &team, &category, 100.0);
    let _b = seed_transaction(&pool, &team, &category, 200.0);
    review_transaction(&pool, &a.get_id(), TransactionStatus::Approved).unwrap();

    let pending = list_team_transactions(&pool, &team.get_id(), Some(TransactionStatus::Pending)).unwrap();
    assert_eq!(pending.len(), 1);

    let approved = list_team_transactions(&pool, &team.get_id(), Some(TransactionStatus::Approved)).unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].get_id(), a.get_id());
}

#[test]
fn test_approved_expense_total_ignores_pending() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (team, _, category) = seed_team(&pool, &association.get_id());

    let a = seed_transaction(&pool, &team, &category, 150.0);
    let _pending = seed_transaction(&pool, &team, &category, 999.0);
    review_transaction(&pool, &a.get_id(), TransactionStatus::Approved).unwrap();

    let total = approved_expense_total(&pool, &team.get_id(), None).unwrap();
    assert_eq!(total, 150.0);

    let per_category = approved_expense_total(&pool, &team.get_id(), Some(&category.get_id())).unwrap();
    assert_eq!(per_category, 150.0);

    let other = approved_expense_total(&pool, &team.get_id(), Some("unknown-category")).unwrap();
    assert_eq!(other, 0.0);
}

#[test]
fn test_update_transaction_receipt_clears_missing_flag() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (team, _, category) = seed_team(&pool, &association.get_id());
    let txn = seed_transaction(&pool, &team, &category, 80.0);
    assert!(txn.get_missing_receipt());

    let changeset = TransactionChangeset {
        receipt_url: Some("https://receipts.example/1.pdf".to_string()),
        ..Default::default()
    };
    let updated = update_transaction(&pool, &txn.get_id(), changeset).unwrap();

    assert!(!updated.get_missing_receipt());
    assert_eq!(updated.get_receipt_url(), Some("https://receipts.example/1.pdf".to_string()));
}

#[test]
fn test_snapshot_latest_ordering() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (_, at, _) = seed_team(&pool, &association.get_id());

    let older = TeamSnapshot::new_at(
        &at.get_id(),
        HealthStatus::Healthy,
        Some(95),
        Some(50_000.0),
        Some(10_000.0),
        Some(40_000.0),
        Some(20.0),
        Some(0),
        Some(0),
        None,
        Utc::now() - Duration::days(2),
    );
    let newer = TeamSnapshot::new_at(
        &at.get_id(),
        HealthStatus::NeedsAttention,
        Some(70),
        Some(50_000.0),
        Some(42_000.0),
        Some(8_000.0),
        Some(84.0),
        Some(2),
        Some(1),
        None,
        Utc::now(),
    );
    create_snapshot(&pool, &older).unwrap();
    create_snapshot(&pool, &newer).unwrap();

    let latest = latest_snapshot(&pool, &at.get_id()).unwrap().unwrap();
    assert_eq!(latest.get_id(), newer.get_id());
    assert_eq!(latest.get_health_status(), HealthStatus::NeedsAttention);

    let history = list_snapshots(&pool, &at.get_id(), 10).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].get_id(), newer.get_id());
}

#[test]
fn test_allocations_join_categories() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (team, _, category) = seed_team(&pool, &association.get_id());

    let allocation = BudgetAllocation::new(&team.get_id(), &category.get_id(), "2025-26".to_string(), 12_000.0);
    create_allocation(&pool, &allocation).unwrap();

    let rows = list_allocations_with_categories(&pool, &team.get_id(), "2025-26").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0.get_allocated(), 12_000.0);
    assert_eq!(rows[0].1.get_name(), "Ice Rental");

    let other_season = list_allocations_with_categories(&pool, &team.get_id(), "2024-25").unwrap();
    assert!(other_season.is_empty());
}

#[test]
fn test_existing_category_ids_scoped_to_association() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (_, _, category) = seed_team(&pool, &association.get_id());

    let ids = existing_category_ids(
        &pool,
        &association.get_id(),
        &[category.get_id(), "not-a-category".to_string()],
    )
    .unwrap();
    assert_eq!(ids, vec![category.get_id()]);
}

#[test]
fn test_alert_resolution_and_feed_window() {
    let pool = setup_test_db();
    let association = onboard(&pool);
    let (_, at, _) = seed_team(&pool, &association.get_id());

    let alert = Alert::new(
        &association.get_id(),
        Some(at.get_id()),
        "OVERSPEND".to_string(),
        "Budget exceeded by 5.0%".to_string(),
        Severity::High,
    );
    create_alert(&pool, &alert).unwrap();

    let feed = recent_unresolved_alerts(&pool, &association.get_id()).unwrap();
    assert_eq!(feed.len(), 1);

    let resolved = resolve_alert(&pool, &association.get_id(), &alert.get_id()).unwrap();
    assert!(resolved.is_resolved());

    let feed = recent_unresolved_alerts(&pool, &association.get_id()).unwrap();
    assert!(feed.is_empty());
}

#[test]
fn test_alert_acknowledge_is_idempotent() {
    let pool = setup_test_db();
    let association = onboard(&pool);

    let alert = Alert::new(
        &association.get_id(),
        None,
        "MULTIPLE_PENDING".to_string(),
        "3 transactions awaiting approval".to_string(),
        Severity::Medium,
    );
    create_alert(&pool, &alert).unwrap();

    let first = acknowledge_alert(&pool, &association.get_id(), &alert.get_id()).unwrap();
    let stamp = first.get_acknowledged_at().unwrap();

    let second = acknowledge_alert(&pool, &association.get_id(), &alert.get_id()).unwrap();
    assert_eq!(second.get_acknowledged_at().unwrap(), stamp);
}

#[test]
fn test_rules_ordering_and_soft_delete() {
    let pool = setup_test_db();
    let association = onboard(&pool);

    let first = AssociationRule::new(
        &association.get_id(),
        RuleType::MaxBudget,
        "Budget cap".to_string(),
        None,
        JsonValue(json!({"maxAmount": 65_000.0})),
        None,
    );
    let second = AssociationRule::new(
        &association.get_id(),
        RuleType::ZeroBalance,
        "Zero balance".to_string(),
        None,
        JsonValue(json!({"tolerance": 50.0})),
        None,
    );
    create_rule(&pool, &first).unwrap();
    create_rule(&pool, &second).unwrap();

    deactivate_rule(&pool, &association.get_id(), &first.get_id()).unwrap();

    let rules = list_rules(&pool, &association.get_id()).unwrap();
    assert_eq!(rules.len(), 2);
    // Active rules sort ahead of deactivated ones
    assert_eq!(rules[0].get_id(), second.get_id());
    assert!(!rules[1].get_is_active());
}

#[test]
fn test_update_rule_config() {
    let pool = setup_test_db();
    let association = onboard(&pool);

    let rule = AssociationRule::new(
        &association.get_id(),
        RuleType::MaxBudget,
        "Budget cap".to_string(),
        None,
        JsonValue(json!({"maxAmount": 65_000.0})),
        None,
    );
    create_rule(&pool, &rule).unwrap();

    let changeset = RuleChangeset {
        config: Some(JsonValue(json!({"maxAmount": 70_000.0}))),
        ..Default::default()
    };
    let updated = update_rule(&pool, &association.get_id(), &rule.get_id(), changeset).unwrap();
    assert_eq!(updated.get_config().0["maxAmount"], 70_000.0);
    assert_eq!(updated.get_name(), "Budget cap");
}
