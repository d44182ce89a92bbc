//! Report shaping and CSV export
//!
//! Three report surfaces: a season financial summary per team, a transaction
//! detail listing, and the alert feed. Each has a JSON row shape plus a CSV
//! serialization with RFC 4180 field escaping.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::alerts;
use crate::db::DbPool;
use crate::models::{HealthStatus, Severity, TransactionStatus};
use crate::repo;

/// One team's season financial summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonFinancialRow {
    pub team_name: String,
    pub division: Option<String>,
    pub budget_total: f64,
    pub approved_spend: f64,
    pub pending_amount: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub health_status: Option<HealthStatus>,
}

/// One transaction in the detail report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionDetailRow {
    pub team_name: String,
    pub transaction_date: DateTime<Utc>,
    pub vendor: String,
    pub category: String,
    pub status: TransactionStatus,
    pub amount: f64,
    pub missing_receipt: bool,
}

/// One alert in the alert report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertReportRow {
    pub team_name: Option<String>,
    pub alert_type: String,
    pub severity: Severity,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
}

/// Builds the season financial summary, one row per team (active or not)
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn build_season_report(pool: &DbPool, association_id: &str) -> Result<Vec<SeasonFinancialRow>> {
    let mut rows = Vec::new();

    for at in repo::list_association_teams(pool, association_id)? {
        let snapshot = repo::latest_snapshot(pool, &at.get_id())?;

        let (budget_total, approved_spend, pending_amount) = match at.get_team_id() {
            Some(team_id) => {
                let budget = repo::get_team(pool, &team_id)?
                    .map(|t| t.get_budget_total())
                    .unwrap_or(0.0);
                let spent = repo::approved_expense_total(pool, &team_id, None)?;
                let pending = repo::pending_total(pool, &team_id)?;
                (budget, spent, pending)
            }
            None => (0.0, 0.0, 0.0),
        };

        let percent_used = if budget_total > 0.0 {
            approved_spend / budget_total * 100.0
        } else {
            0.0
        };

        rows.push(SeasonFinancialRow {
            team_name: at.get_team_name(),
            division: at.get_division(),
            budget_total,
            approved_spend,
            pending_amount,
            remaining: budget_total - approved_spend,
            percent_used,
            health_status: snapshot.map(|s| s.get_health_status()),
        });
    }

    Ok(rows)
}

/// Builds the transaction detail report across all of an association's teams
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn build_transaction_report(
    pool: &DbPool,
    association_id: &str,
) -> Result<Vec<TransactionDetailRow>> {
    let category_names: HashMap<String, String> = repo::list_categories(pool, association_id)?
        .into_iter()
        .map(|c| (c.get_id(), c.get_name()))
        .collect();

    let mut rows = Vec::new();

    for at in repo::list_association_teams(pool, association_id)? {
        let Some(team_id) = at.get_team_id() else {
            continue;
        };

        for txn in repo::list_team_transactions(pool, &team_id, None)? {
            rows.push(TransactionDetailRow {
                team_name: at.get_team_name(),
                transaction_date: txn.get_transaction_date(),
                vendor: txn.get_vendor(),
                category: category_names
                    .get(&txn.get_category_id())
                    .cloned()
                    .unwrap_or_else(|| "Uncategorized".to_string()),
                status: txn.get_status(),
                amount: txn.get_amount(),
                missing_receipt: txn.get_missing_receipt(),
            });
        }
    }

    rows.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    Ok(rows)
}

/// Builds the alert report from the normalized association feed
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn build_alert_report(pool: &DbPool, association_id: &str) -> Result<Vec<AlertReportRow>> {
    let feed = alerts::build_association_alerts(pool, association_id)?;

    Ok(feed
        .into_iter()
        .map(|a| AlertReportRow {
            team_name: a.team_name,
            alert_type: a.alert_type,
            severity: a.severity,
            title: a.title,
            created_at: a.created_at,
            acknowledged: a.acknowledged,
        })
        .collect())
}

/// Escapes one CSV field per RFC 4180
///
/// Fields containing a comma, quote, or newline are wrapped in quotes with
/// embedded quotes doubled; everything else passes through untouched.
pub fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes the season report as CSV
pub fn season_report_csv(rows: &[SeasonFinancialRow]) -> String {
    let mut out = String::from(
        "Team,Division,Budget,Approved Spend,Pending,Remaining,Percent Used,Health\n",
    );
    for row in rows {
        out.push_str(&csv_line(&[
            row.team_name.clone(),
            row.division.clone().unwrap_or_default(),
            format!("{:.2}", row.budget_total),
            format!("{:.2}", row.approved_spend),
            format!("{:.2}", row.pending_amount),
            format!("{:.2}", row.remaining),
            format!("{:.1}", row.percent_used),
            row.health_status.map(|s| s.to_string()).unwrap_or_default(),
        ]));
        out.push('\n');
    }
    out
}

/// Serializes the transaction report as CSV
pub fn transaction_report_csv(rows: &[TransactionDetailRow]) -> String {
    let mut out = String::from("Team,Date,Vendor,Category,Status,Amount,Missing Receipt\n");
    for row in rows {
        out.push_str(&csv_line(&[
            row.team_name.clone(),
            row.transaction_date.format("%Y-%m-%d").to_string(),
            row.vendor.clone(),
            row.category.clone(),
            row.status.to_string(),
            format!("{:.2}", row.amount),
            if row.missing_receipt { "yes" } else { "no" }.to_string(),
        ]));
        out.push('\n');
    }
    out
}

/// Serializes the alert report as CSV
pub fn alert_report_csv(rows: &[AlertReportRow]) -> String {
    let mut out = String::from("Team,Type,Severity,Title,Created,Acknowledged\n");
    for row in rows {
        out.push_str(&csv_line(&[
            row.team_name.clone().unwrap_or_default(),
            row.alert_type.clone(),
            row.severity.to_string(),
            row.title.clone(),
            row.created_at.format("%Y-%m-%d %H:%M").to_string(),
            if row.acknowledged { "yes" } else { "no" }.to_string(),
        ]));
        out.push('\n');
    }
    out
}
