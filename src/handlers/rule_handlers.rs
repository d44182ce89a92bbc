use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{CreateRuleDto, RulesData, SetRuleActiveDto, UpdateRuleDto};
use crate::errors::ApiError;
use crate::models::{AssociationRule, JsonValue, RuleType};
use crate::repo;

use super::association_handlers::require_association;

/// Handler for listing an association's governance rules
///
/// This function handles GET requests to `/associations/{id}/rules`:
/// active rules first, newest first within each group.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub async fn list_rules_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
) -> Result<Json<RulesData>, ApiError> {
    require_association(&pool, &association_id)?;
    let rules = repo::list_rules(&pool, &association_id).map_err(ApiError::Database)?;
    Ok(Json(RulesData { rules }))
}

/// Handler for creating a governance rule
///
/// This function handles POST requests to `/associations/{id}/rules`. The
/// rule type must be known and the config must match the type's expected
/// shape (amount-cap types require a positive `maxAmount`).
#[instrument(skip(pool, payload), fields(association_id = %association_id, rule_type = %payload.rule_type))]
pub async fn create_rule_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
    Json(payload): Json<CreateRuleDto>,
) -> Result<(StatusCode, Json<AssociationRule>), ApiError> {
    info!("Creating association rule");

    require_association(&pool, &association_id)?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Rule name is required".to_string()));
    }

    let rule_type = RuleType::from_str(&payload.rule_type)
        .map_err(|_| ApiError::Validation(format!("Unknown rule type: {}", payload.rule_type)))?;

    AssociationRule::validate_config(rule_type, &payload.config).map_err(ApiError::Validation)?;

    let rule = AssociationRule::new(
        &association_id,
        rule_type,
        payload.name,
        payload.description,
        JsonValue(payload.config),
        payload.created_by,
    );
    repo::create_rule(&pool, &rule).map_err(ApiError::Database)?;

    info!("Created rule with id: {}", rule.get_id());
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Handler for fetching one rule
///
/// This function handles GET requests to `/associations/{id}/rules/{rule_id}`.
#[instrument(skip(pool), fields(association_id = %association_id, rule_id = %rule_id))]
pub async fn get_rule_handler(
    State(pool): State<Arc<DbPool>>,
    Path((association_id, rule_id)): Path<(String, String)>,
) -> Result<Json<AssociationRule>, ApiError> {
    require_association(&pool, &association_id)?;
    let rule = repo::get_rule(&pool, &association_id, &rule_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(rule))
}

/// Handler for editing a rule
///
/// This function handles PUT requests to `/associations/{id}/rules/{rule_id}`.
/// A new config is validated against the rule's existing type.
#[instrument(skip(pool, payload), fields(association_id = %association_id, rule_id = %rule_id))]
pub async fn update_rule_handler(
    State(pool): State<Arc<DbPool>>,
    Path((association_id, rule_id)): Path<(String, String)>,
    Json(payload): Json<UpdateRuleDto>,
) -> Result<Json<AssociationRule>, ApiError> {
    debug!("Updating association rule");

    require_association(&pool, &association_id)?;
    let existing = repo::get_rule(&pool, &association_id, &rule_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    if let Some(ref config) = payload.config {
        AssociationRule::validate_config(existing.get_rule_type(), config)
            .map_err(ApiError::Validation)?;
    }

    let changeset = repo::RuleChangeset {
        name: payload.name,
        description: payload.description,
        is_active: payload.is_active,
        config: payload.config.map(JsonValue),
    };
    let updated =
        repo::update_rule(&pool, &association_id, &rule_id, changeset).map_err(ApiError::Database)?;
    Ok(Json(updated))
}

/// Handler for toggling a rule's active flag
///
/// This function handles PUT requests to
/// `/associations/{id}/rules/{rule_id}/active`.
#[instrument(skip(pool, payload), fields(association_id = %association_id, rule_id = %rule_id))]
pub async fn set_rule_active_handler(
    State(pool): State<Arc<DbPool>>,
    Path((association_id, rule_id)): Path<(String, String)>,
    Json(payload): Json<SetRuleActiveDto>,
) -> Result<Json<AssociationRule>, ApiError> {
    require_association(&pool, &association_id)?;
    let _existing = repo::get_rule(&pool, &association_id, &rule_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let changeset = repo::RuleChangeset {
        is_active: Some(payload.is_active),
        ..Default::default()
    };
    let updated =
        repo::update_rule(&pool, &association_id, &rule_id, changeset).map_err(ApiError::Database)?;
    Ok(Json(updated))
}

/// Handler for deleting a rule
///
/// This function handles DELETE requests to
/// `/associations/{id}/rules/{rule_id}`. Deletion is a soft delete: the rule
/// is deactivated and stays in the listing.
#[instrument(skip(pool), fields(association_id = %association_id, rule_id = %rule_id))]
pub async fn delete_rule_handler(
    State(pool): State<Arc<DbPool>>,
    Path((association_id, rule_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    require_association(&pool, &association_id)?;
    let _existing = repo::get_rule(&pool, &association_id, &rule_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    repo::deactivate_rule(&pool, &association_id, &rule_id).map_err(ApiError::Database)?;
    Ok(StatusCode::NO_CONTENT)
}
