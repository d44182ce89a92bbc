use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-association thresholds used when computing team health snapshots
///
/// Every association gets exactly one of these at onboarding time. The
/// defaults match the onboarding wizard defaults.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::dashboard_configs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DashboardConfig {
    id: String,
    association_id: String,

    /// Budget utilization percentages
    budget_warning_pct: f64,
    budget_critical_pct: f64,

    /// Days since last bank reconciliation
    bank_warning_days: i32,
    bank_critical_days: i32,

    /// Pending approval counts
    approvals_warning_count: i32,
    approvals_critical_count: i32,

    /// Days without team activity before a warning
    inactivity_warning_days: i32,

    created_at: NaiveDateTime,
}

impl DashboardConfig {
    pub fn new(association_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            association_id: association_id.to_string(),
            budget_warning_pct: 80.0,
            budget_critical_pct: 95.0,
            bank_warning_days: 30,
            bank_critical_days: 60,
            approvals_warning_count: 5,
            approvals_critical_count: 10,
            inactivity_warning_days: 21,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Creates a config with explicit thresholds, as submitted by the
    /// onboarding wizard
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_thresholds(
        association_id: &str,
        budget_warning_pct: f64,
        budget_critical_pct: f64,
        bank_warning_days: i32,
        bank_critical_days: i32,
        approvals_warning_count: i32,
        approvals_critical_count: i32,
        inactivity_warning_days: i32,
    ) -> Self {
        Self {
            budget_warning_pct,
            budget_critical_pct,
            bank_warning_days,
            bank_critical_days,
            approvals_warning_count,
            approvals_critical_count,
            inactivity_warning_days,
            ..Self::new(association_id)
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_association_id(&self) -> String {
        self.association_id.clone()
    }

    pub fn get_budget_warning_pct(&self) -> f64 {
        self.budget_warning_pct
    }

    pub fn get_budget_critical_pct(&self) -> f64 {
        self.budget_critical_pct
    }

    pub fn get_bank_warning_days(&self) -> i32 {
        self.bank_warning_days
    }

    pub fn get_bank_critical_days(&self) -> i32 {
        self.bank_critical_days
    }

    pub fn get_approvals_warning_count(&self) -> i32 {
        self.approvals_warning_count
    }

    pub fn get_approvals_critical_count(&self) -> i32 {
        self.approvals_critical_count
    }

    pub fn get_inactivity_warning_days(&self) -> i32 {
        self.inactivity_warning_days
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
