//! Alert aggregation
//!
//! The alert feed is synthesized, not just stored: unresolved rows from the
//! alerts table are merged with alerts derived on the fly from pending
//! transactions, missing receipts, and the latest snapshot's thresholds.
//! Everything is normalized into one shape and sorted newest first.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::db::DbPool;
use crate::models::{Alert, AssociationTeam, HealthStatus, Severity, Transaction};
use crate::repo;

/// How many synthesized transaction alerts each source contributes per team
const TRANSACTION_ALERT_CAP: i64 = 5;

/// Snapshot thresholds for synthesized usage/backlog alerts
const OVERSPEND_PCT: f64 = 100.0;
const HIGH_USAGE_PCT: f64 = 90.0;
const BACKLOG_THRESHOLD: i32 = 3;

/// One entry in the alert feed, whatever its source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedAlert {
    pub id: String,
    pub association_team_id: Option<String>,
    pub team_name: Option<String>,
    pub alert_type: String,
    pub title: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
}

impl NormalizedAlert {
    fn from_stored(alert: &Alert, team_name: Option<String>) -> Self {
        Self {
            id: alert.get_id(),
            association_team_id: alert.get_association_team_id(),
            team_name,
            alert_type: alert.get_alert_type(),
            title: alert.get_title(),
            severity: alert.get_severity(),
            created_at: alert.get_created_at(),
            acknowledged: alert.get_acknowledged_at().is_some(),
        }
    }

    fn synthesized(
        id: String,
        team: &AssociationTeam,
        alert_type: &str,
        title: String,
        severity: Severity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            association_team_id: Some(team.get_id()),
            team_name: Some(team.get_team_name()),
            alert_type: alert_type.to_string(),
            title,
            severity,
            created_at,
            acknowledged: false,
        }
    }
}

fn pending_alert(team: &AssociationTeam, txn: &Transaction) -> NormalizedAlert {
    NormalizedAlert::synthesized(
        format!("pending-{}", txn.get_id()),
        team,
        "PENDING_APPROVAL",
        format!("Pending approval for {} - ${:.2}", txn.get_vendor(), txn.get_amount()),
        Severity::Medium,
        txn.get_created_at(),
    )
}

fn missing_receipt_alert(team: &AssociationTeam, txn: &Transaction) -> NormalizedAlert {
    NormalizedAlert::synthesized(
        format!("receipt-{}", txn.get_id()),
        team,
        "MISSING_RECEIPT",
        format!("Missing receipt for {} - ${:.2}", txn.get_vendor(), txn.get_amount()),
        Severity::High,
        txn.get_created_at(),
    )
}

/// Builds the full alert feed for one association team
///
/// Sources, in order: unresolved stored alerts, recent pending transactions,
/// approved transactions missing receipts, and the latest snapshot's
/// threshold breaches. The result is sorted by `created_at` descending.
#[instrument(skip(pool, team), fields(association_team_id = %team.get_id()))]
pub fn build_team_alerts(pool: &DbPool, team: &AssociationTeam) -> Result<Vec<NormalizedAlert>> {
    let mut feed: Vec<NormalizedAlert> = Vec::new();

    for alert in repo::unresolved_alerts_for_team(pool, &team.get_id())? {
        feed.push(NormalizedAlert::from_stored(&alert, Some(team.get_team_name())));
    }

    // Transaction-derived alerts need the linked operational team
    if let Some(team_id) = team.get_team_id() {
        for txn in repo::pending_transactions(pool, &team_id, Some(TRANSACTION_ALERT_CAP))? {
            feed.push(pending_alert(team, &txn));
        }

        for txn in repo::approved_missing_receipt_transactions(pool, &team_id, TRANSACTION_ALERT_CAP)? {
            feed.push(missing_receipt_alert(team, &txn));
        }
    }

    if let Some(snapshot) = repo::latest_snapshot(pool, &team.get_id())? {
        let at = snapshot.get_snapshot_at();

        match snapshot.get_health_status() {
            HealthStatus::AtRisk => feed.push(NormalizedAlert::synthesized(
                format!("health-{}", team.get_id()),
                team,
                "CRITICAL_HEALTH",
                format!(
                    "Team health is critical (Score: {}/100)",
                    snapshot.get_health_score().unwrap_or(0)
                ),
                Severity::High,
                at,
            )),
            HealthStatus::NeedsAttention => feed.push(NormalizedAlert::synthesized(
                format!("health-{}", team.get_id()),
                team,
                "WARNING_HEALTH",
                format!(
                    "Team health needs attention (Score: {}/100)",
                    snapshot.get_health_score().unwrap_or(0)
                ),
                Severity::Medium,
                at,
            )),
            HealthStatus::Healthy => {}
        }

        if let Some(percent_used) = snapshot.get_percent_used() {
            if percent_used > OVERSPEND_PCT {
                feed.push(NormalizedAlert::synthesized(
                    format!("overspend-{}", team.get_id()),
                    team,
                    "OVERSPEND",
                    format!("Budget exceeded by {:.1}%", percent_used - 100.0),
                    Severity::High,
                    at,
                ));
            } else if percent_used >= HIGH_USAGE_PCT {
                feed.push(NormalizedAlert::synthesized(
                    format!("usage-{}", team.get_id()),
                    team,
                    "HIGH_BUDGET_USAGE",
                    format!("Budget usage at {:.1}% - approaching limit", percent_used),
                    Severity::Medium,
                    at,
                ));
            }
        }

        if snapshot.get_pending_reviews().unwrap_or(0) >= BACKLOG_THRESHOLD {
            feed.push(NormalizedAlert::synthesized(
                format!("backlog-{}", team.get_id()),
                team,
                "MULTIPLE_PENDING",
                format!(
                    "{} transactions awaiting approval",
                    snapshot.get_pending_reviews().unwrap_or(0)
                ),
                Severity::Medium,
                at,
            ));
        }

        if snapshot.get_missing_receipts().unwrap_or(0) >= BACKLOG_THRESHOLD {
            feed.push(NormalizedAlert::synthesized(
                format!("receipts-{}", team.get_id()),
                team,
                "MULTIPLE_RECEIPTS",
                format!(
                    "{} missing receipts require attention",
                    snapshot.get_missing_receipts().unwrap_or(0)
                ),
                Severity::High,
                at,
            ));
        }
    }

    feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(feed)
}

/// Builds the association-wide alert feed
///
/// Merges each active team's feed with unresolved association-level stored
/// alerts, sorted by `created_at` descending.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn build_association_alerts(pool: &DbPool, association_id: &str) -> Result<Vec<NormalizedAlert>> {
    let mut feed: Vec<NormalizedAlert> = Vec::new();

    for alert in repo::unresolved_association_level_alerts(pool, association_id)? {
        feed.push(NormalizedAlert::from_stored(&alert, None));
    }

    for team in repo::list_active_association_teams(pool, association_id)? {
        feed.extend(build_team_alerts(pool, &team)?);
    }

    feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(feed)
}
