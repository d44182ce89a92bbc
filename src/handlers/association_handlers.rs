use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{
    OnboardAssociationDto, OverviewData, ReceiptPolicyDto, SettingsData, TeamOverviewData,
    UpdateAssociationDto, UpdateUserRoleDto,
};
use crate::errors::ApiError;
use crate::models::{Association, AssociationUser, DashboardConfig, JsonValue, UserRole};
use crate::repo;

/// Fetches an association or fails the request with a 404
pub(crate) fn require_association(pool: &DbPool, association_id: &str) -> Result<Association, ApiError> {
    repo::get_association(pool, association_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)
}

/// Handler for the onboarding wizard's final submission
///
/// This function handles POST requests to `/associations`. It creates the
/// association, its admin user and board members, and its dashboard config
/// in one transaction. A duplicate association name is a 409.
#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn onboard_association_handler(
    State(pool): State<Arc<DbPool>>,
    Json(payload): Json<OnboardAssociationDto>,
) -> Result<(StatusCode, Json<Association>), ApiError> {
    info!("Onboarding new association");

    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Association name is required".to_string()));
    }
    if payload.admin_email.trim().is_empty() {
        return Err(ApiError::Validation("Admin email is required".to_string()));
    }

    let existing = repo::find_association_by_name(&pool, &payload.name).map_err(ApiError::Database)?;
    if existing.is_some() {
        return Err(ApiError::Conflict(format!(
            "An association named '{}' already exists",
            payload.name
        )));
    }

    let mut association = Association::new(
        payload.name,
        payload.currency.unwrap_or_else(|| "CAD".to_string()),
    );
    association.set_abbreviation(payload.abbreviation);
    association.set_province_state(payload.province_state);
    association.set_country(payload.country);
    association.set_season(payload.season);
    if payload.pre_season_budget_deadline.is_some() || payload.pre_season_budgets_required.is_some()
    {
        association.set_pre_season_budgets(
            payload.pre_season_budget_deadline,
            payload.pre_season_budgets_required,
            payload.pre_season_budget_auto_approve,
        );
    }

    let mut users = vec![AssociationUser::new(
        &association.get_id(),
        payload.admin_email,
        payload.admin_name,
        UserRole::AssociationAdmin,
    )];
    for member in payload.board_members {
        users.push(AssociationUser::new(
            &association.get_id(),
            member.email,
            member.name,
            member.role.unwrap_or(UserRole::BoardMember),
        ));
    }

    let thresholds = payload.thresholds.unwrap_or_default();
    let defaults = DashboardConfig::new(&association.get_id());
    let config = DashboardConfig::new_with_thresholds(
        &association.get_id(),
        thresholds.budget_warning_pct.unwrap_or(defaults.get_budget_warning_pct()),
        thresholds.budget_critical_pct.unwrap_or(defaults.get_budget_critical_pct()),
        thresholds.bank_warning_days.unwrap_or(defaults.get_bank_warning_days()),
        thresholds.bank_critical_days.unwrap_or(defaults.get_bank_critical_days()),
        thresholds.approvals_warning_count.unwrap_or(defaults.get_approvals_warning_count()),
        thresholds.approvals_critical_count.unwrap_or(defaults.get_approvals_critical_count()),
        thresholds.inactivity_warning_days.unwrap_or(defaults.get_inactivity_warning_days()),
    );

    repo::onboard_association(&pool, &association, &users, &config).map_err(ApiError::Database)?;

    info!("Onboarded association with id: {}", association.get_id());
    Ok((StatusCode::CREATED, Json(association)))
}

/// Handler for the association overview dashboard
///
/// This function handles GET requests to `/associations/{id}/overview`:
/// the association header, each active team with its linked team and latest
/// snapshot, and the recent unresolved stored alerts.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub async fn overview_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
) -> Result<Json<OverviewData>, ApiError> {
    debug!("Building association overview");

    let association = require_association(&pool, &association_id)?;

    let mut teams = Vec::new();
    for at in repo::list_active_association_teams(&pool, &association_id).map_err(ApiError::Database)? {
        let team = match at.get_team_id() {
            Some(team_id) => repo::get_team(&pool, &team_id).map_err(ApiError::Database)?,
            None => None,
        };
        let latest_snapshot = repo::latest_snapshot(&pool, &at.get_id()).map_err(ApiError::Database)?;
        teams.push(TeamOverviewData { association_team: at, team, latest_snapshot });
    }

    let recent_alerts =
        repo::recent_unresolved_alerts(&pool, &association_id).map_err(ApiError::Database)?;

    Ok(Json(OverviewData { association, teams, recent_alerts }))
}

/// Handler for the settings page
///
/// This function handles GET requests to `/associations/{id}/settings`.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub async fn settings_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
) -> Result<Json<SettingsData>, ApiError> {
    let association = require_association(&pool, &association_id)?;
    let users = repo::list_users(&pool, &association_id).map_err(ApiError::Database)?;
    let dashboard_config =
        repo::get_dashboard_config(&pool, &association_id).map_err(ApiError::Database)?;

    Ok(Json(SettingsData { association, users, dashboard_config }))
}

/// Handler for partial association updates
///
/// This function handles PUT requests to `/associations/{id}`.
#[instrument(skip(pool, payload), fields(association_id = %association_id))]
pub async fn update_association_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
    Json(payload): Json<UpdateAssociationDto>,
) -> Result<Json<Association>, ApiError> {
    debug!("Updating association");

    let _existing = require_association(&pool, &association_id)?;

    if let Some(ref name) = payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Association name cannot be empty".to_string()));
        }
        let clash = repo::find_association_by_name(&pool, name).map_err(ApiError::Database)?;
        if clash.is_some_and(|other| other.get_id() != association_id) {
            return Err(ApiError::Conflict(format!("An association named '{}' already exists", name)));
        }
    }

    let changeset = repo::AssociationChangeset {
        name: payload.name,
        abbreviation: payload.abbreviation,
        province_state: payload.province_state,
        country: payload.country,
        currency: payload.currency,
        season: payload.season,
        logo_url: payload.logo_url,
        pre_season_budget_deadline: payload.pre_season_budget_deadline.map(|d| d.naive_utc()),
        pre_season_budgets_required: payload.pre_season_budgets_required,
        pre_season_budget_auto_approve: payload.pre_season_budget_auto_approve,
    };

    let updated =
        repo::update_association(&pool, &association_id, changeset).map_err(ApiError::Database)?;
    Ok(Json(updated))
}

/// Handler for updating an association user's role
///
/// This function handles PUT requests to `/association_users/{id}/role`.
/// Unknown role strings are rejected during deserialization.
#[instrument(skip(pool, payload), fields(user_id = %user_id))]
pub async fn update_user_role_handler(
    State(pool): State<Arc<DbPool>>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRoleDto>,
) -> Result<Json<crate::models::AssociationUser>, ApiError> {
    let _existing = repo::get_user(&pool, &user_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let updated = repo::update_user_role(&pool, &user_id, payload.role).map_err(ApiError::Database)?;
    info!("Updated role for user {}", user_id);
    Ok(Json(updated))
}

/// Handler for reading the receipt policy
///
/// This function handles GET requests to `/associations/{id}/receipt-policy`.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub async fn get_receipt_policy_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
) -> Result<Json<ReceiptPolicyDto>, ApiError> {
    let association = require_association(&pool, &association_id)?;
    Ok(Json(ReceiptPolicyDto::from_association(&association)))
}

/// Handler for replacing the receipt policy
///
/// This function handles PUT requests to `/associations/{id}/receipt-policy`.
/// Category override keys must reference categories belonging to the
/// association; thresholds and grace periods must be within bounds.
#[instrument(skip(pool, payload), fields(association_id = %association_id))]
pub async fn update_receipt_policy_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
    Json(payload): Json<ReceiptPolicyDto>,
) -> Result<Json<ReceiptPolicyDto>, ApiError> {
    debug!("Updating receipt policy");

    let _existing = require_association(&pool, &association_id)?;

    if payload.global_threshold_cents < 0 {
        return Err(ApiError::Validation("Receipt threshold cannot be negative".to_string()));
    }
    if !(0..=365).contains(&payload.grace_period_days) {
        return Err(ApiError::Validation(
            "Grace period must be between 0 and 365 days".to_string(),
        ));
    }

    let overrides = payload
        .category_overrides
        .as_object()
        .ok_or_else(|| ApiError::Validation("Category overrides must be a JSON object".to_string()))?;

    if !overrides.is_empty() {
        for value in overrides.values() {
            let cents = value.as_i64().ok_or_else(|| {
                ApiError::Validation("Category override thresholds must be integers".to_string())
            })?;
            if cents < 0 {
                return Err(ApiError::Validation(
                    "Category override thresholds cannot be negative".to_string(),
                ));
            }
        }

        let requested: Vec<String> = overrides.keys().cloned().collect();
        let known = repo::existing_category_ids(&pool, &association_id, &requested)
            .map_err(ApiError::Database)?;
        if known.len() != requested.len() {
            return Err(ApiError::Validation(
                "Category overrides reference categories outside this association".to_string(),
            ));
        }
    }

    let changeset = repo::ReceiptPolicyChangeset {
        receipts_enabled: payload.receipts_enabled,
        receipt_global_threshold_cents: payload.global_threshold_cents,
        receipt_grace_period_days: payload.grace_period_days,
        receipt_category_thresholds_enabled: payload.category_thresholds_enabled,
        receipt_category_overrides: JsonValue(payload.category_overrides),
        allowed_team_threshold_override: payload.allowed_team_threshold_override,
    };

    let updated =
        repo::update_receipt_policy(&pool, &association_id, changeset).map_err(ApiError::Database)?;

    info!("Receipt policy updated for association {}", association_id);
    Ok(Json(ReceiptPolicyDto::from_association(&updated)))
}
