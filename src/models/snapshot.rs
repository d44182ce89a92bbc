use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HealthStatus, JsonValue};

/// A stored point-in-time rollup of a team's financial health
///
/// Snapshots are append-only; "the latest snapshot" always means the row
/// with the greatest `snapshot_at` for an association team.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::team_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TeamSnapshot {
    id: String,
    association_team_id: String,
    health_status: HealthStatus,
    health_score: Option<i32>,
    budget_total: Option<f64>,
    spent: Option<f64>,
    remaining: Option<f64>,
    percent_used: Option<f64>,
    pending_reviews: Option<i32>,
    missing_receipts: Option<i32>,
    /// Red flags raised during health computation, stored as a JSON array
    red_flags: Option<JsonValue>,
    snapshot_at: NaiveDateTime,
}

impl TeamSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        association_team_id: &str,
        health_status: HealthStatus,
        health_score: Option<i32>,
        budget_total: Option<f64>,
        spent: Option<f64>,
        remaining: Option<f64>,
        percent_used: Option<f64>,
        pending_reviews: Option<i32>,
        missing_receipts: Option<i32>,
        red_flags: Option<JsonValue>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            association_team_id: association_team_id.to_string(),
            health_status,
            health_score,
            budget_total,
            spent,
            remaining,
            percent_used,
            pending_reviews,
            missing_receipts,
            red_flags,
            snapshot_at: Utc::now().naive_utc(),
        }
    }

    /// Builds a snapshot with an explicit timestamp. Used when backfilling
    /// history and in tests that need a fixed ordering.
    #[allow(clippy::too_many_arguments)]
    pub fn new_at(
        association_team_id: &str,
        health_status: HealthStatus,
        health_score: Option<i32>,
        budget_total: Option<f64>,
        spent: Option<f64>,
        remaining: Option<f64>,
        percent_used: Option<f64>,
        pending_reviews: Option<i32>,
        missing_receipts: Option<i32>,
        red_flags: Option<JsonValue>,
        snapshot_at: DateTime<Utc>,
    ) -> Self {
        Self {
            snapshot_at: snapshot_at.naive_utc(),
            ..Self::new(
                association_team_id,
                health_status,
                health_score,
                budget_total,
                spent,
                remaining,
                percent_used,
                pending_reviews,
                missing_receipts,
                red_flags,
            )
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_association_team_id(&self) -> String {
        self.association_team_id.clone()
    }

    pub fn get_health_status(&self) -> HealthStatus {
        self.health_status
    }

    pub fn get_health_score(&self) -> Option<i32> {
        self.health_score
    }

    pub fn get_budget_total(&self) -> Option<f64> {
        self.budget_total
    }

    pub fn get_spent(&self) -> Option<f64> {
        self.spent
    }

    pub fn get_remaining(&self) -> Option<f64> {
        self.remaining
    }

    pub fn get_percent_used(&self) -> Option<f64> {
        self.percent_used
    }

    pub fn get_pending_reviews(&self) -> Option<i32> {
        self.pending_reviews
    }

    pub fn get_missing_receipts(&self) -> Option<i32> {
        self.missing_receipts
    }

    pub fn get_red_flags(&self) -> Option<JsonValue> {
        self.red_flags.clone()
    }

    pub fn get_snapshot_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.snapshot_at, Utc)
    }
}
