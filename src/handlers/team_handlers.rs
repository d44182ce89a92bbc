use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::alerts;
use crate::db::DbPool;
use crate::dto::{CategoryRollupData, TeamDetailData};
use crate::errors::ApiError;
use crate::health::{self, TeamFinancials};
use crate::models::{AssociationTeam, JsonValue, TeamSnapshot};
use crate::repo;

use super::association_handlers::require_association;

fn require_association_team(
    pool: &DbPool,
    association_id: &str,
    association_team_id: &str,
) -> Result<AssociationTeam, ApiError> {
    require_association(pool, association_id)?;
    repo::get_association_team(pool, association_id, association_team_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)
}

/// Handler for the team detail page
///
/// This function handles GET requests to
/// `/associations/{id}/teams/{team_id}`: the association team and its linked
/// team, the latest snapshot, a budget-by-category rollup, transaction
/// listings, the team's alert feed, and recent snapshot history.
#[instrument(skip(pool), fields(association_id = %association_id, association_team_id = %association_team_id))]
pub async fn team_detail_handler(
    State(pool): State<Arc<DbPool>>,
    Path((association_id, association_team_id)): Path<(String, String)>,
) -> Result<Json<TeamDetailData>, ApiError> {
    debug!("Building team detail");

    let at = require_association_team(&pool, &association_id, &association_team_id)?;

    let team = match at.get_team_id() {
        Some(team_id) => repo::get_team(&pool, &team_id).map_err(ApiError::Database)?,
        None => None,
    };

    let latest_snapshot = repo::latest_snapshot(&pool, &at.get_id()).map_err(ApiError::Database)?;

    let mut budget_categories = Vec::new();
    let mut transactions = Vec::new();
    let mut recent_approved = Vec::new();
    let mut pending_transactions = Vec::new();

    if let Some(ref linked) = team {
        let allocations =
            repo::list_allocations_with_categories(&pool, &linked.get_id(), &linked.get_season())
                .map_err(ApiError::Database)?;
        for (allocation, category) in allocations {
            let spent = repo::approved_expense_total(&pool, &linked.get_id(), Some(&category.get_id()))
                .map_err(ApiError::Database)?;
            let allocated = allocation.get_allocated();
            let percent_used = if allocated > 0.0 { spent / allocated * 100.0 } else { 0.0 };
            budget_categories.push(CategoryRollupData {
                category,
                allocated,
                spent,
                remaining: allocated - spent,
                percent_used,
            });
        }

        transactions =
            repo::list_team_transactions(&pool, &linked.get_id(), None).map_err(ApiError::Database)?;
        recent_approved = repo::recent_approved_transactions(&pool, &linked.get_id(), 10)
            .map_err(ApiError::Database)?;
        pending_transactions =
            repo::pending_transactions(&pool, &linked.get_id(), None).map_err(ApiError::Database)?;
    }

    let team_alerts = alerts::build_team_alerts(&pool, &at).map_err(ApiError::Database)?;
    let snapshot_history = repo::list_snapshots(&pool, &at.get_id(), 10).map_err(ApiError::Database)?;

    Ok(Json(TeamDetailData {
        association_team: at,
        team,
        latest_snapshot,
        budget_categories,
        transactions,
        recent_approved,
        pending_transactions,
        alerts: team_alerts,
        snapshot_history,
    }))
}

/// Handler for taking a fresh snapshot of a team's financial health
///
/// This function handles POST requests to
/// `/associations/{id}/teams/{team_id}/snapshots`. It assembles the team's
/// current financial picture, evaluates it against the association's
/// dashboard thresholds, and appends the result to the snapshot history.
#[instrument(skip(pool), fields(association_id = %association_id, association_team_id = %association_team_id))]
pub async fn run_snapshot_handler(
    State(pool): State<Arc<DbPool>>,
    Path((association_id, association_team_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<TeamSnapshot>), ApiError> {
    info!("Taking team snapshot");

    let at = require_association_team(&pool, &association_id, &association_team_id)?;
    let team_id = at
        .get_team_id()
        .ok_or_else(|| ApiError::Validation("Team is not connected yet".to_string()))?;
    let team = repo::get_team(&pool, &team_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;
    let config = repo::get_dashboard_config(&pool, &association_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let spent = repo::approved_expense_total(&pool, &team_id, None).map_err(ApiError::Database)?;
    let financials = TeamFinancials {
        budget_total: team.get_budget_total(),
        spent,
        pending_amount: repo::pending_total(&pool, &team_id).map_err(ApiError::Database)?,
        pending_count: repo::pending_count(&pool, &team_id).map_err(ApiError::Database)?,
        missing_receipts: repo::missing_receipt_count(&pool, &team_id).map_err(ApiError::Database)?,
        bank_connected: at.get_connected_at().is_some(),
        bank_reconciled_at: at.get_last_synced_at(),
        last_activity_at: repo::last_activity_at(&pool, &team_id)
            .map_err(ApiError::Database)?
            .map(|ts| chrono::DateTime::from_naive_utc_and_offset(ts, Utc)),
    };

    let assessment = health::assess_health(&financials, &config, Utc::now());

    let snapshot = TeamSnapshot::new(
        &at.get_id(),
        assessment.status,
        Some(assessment.score),
        Some(financials.budget_total),
        Some(financials.spent),
        Some(financials.remaining()),
        Some(financials.percent_used()),
        Some(financials.pending_count as i32),
        Some(financials.missing_receipts as i32),
        Some(JsonValue(json!(assessment.red_flags))),
    );
    repo::create_snapshot(&pool, &snapshot).map_err(ApiError::Database)?;

    info!(
        "Snapshot recorded for team {} with status {}",
        at.get_id(),
        snapshot.get_health_status()
    );
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// Handler for snapshot history
///
/// This function handles GET requests to
/// `/associations/{id}/teams/{team_id}/snapshots` (last 10, newest first).
#[instrument(skip(pool), fields(association_id = %association_id, association_team_id = %association_team_id))]
pub async fn snapshot_history_handler(
    State(pool): State<Arc<DbPool>>,
    Path((association_id, association_team_id)): Path<(String, String)>,
) -> Result<Json<Vec<TeamSnapshot>>, ApiError> {
    let at = require_association_team(&pool, &association_id, &association_team_id)?;
    let history = repo::list_snapshots(&pool, &at.get_id(), 10).map_err(ApiError::Database)?;
    Ok(Json(history))
}
