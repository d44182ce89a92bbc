use crate::db::DbPool;
use crate::models::{AssociationRule, JsonValue};
use crate::schema::association_rules;
use anyhow::{Result, anyhow};
use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a governance rule
#[instrument(skip(pool, rule), fields(rule_type = %rule.get_rule_type(), name = %rule.get_name()))]
pub fn create_rule(pool: &DbPool, rule: &AssociationRule) -> Result<()> {
    debug!("Creating association rule");

    let conn = &mut pool.get()?;
    diesel::insert_into(association_rules::table)
        .values(rule)
        .execute(conn)?;

    Ok(())
}

/// Retrieves a rule by ID, scoped to an association
#[instrument(skip(pool), fields(association_id = %association_id, rule_id = %rule_id))]
pub fn get_rule(pool: &DbPool, association_id: &str, rule_id: &str) -> Result<Option<AssociationRule>> {
    let conn = &mut pool.get()?;

    let result = association_rules::table
        .filter(association_rules::id.eq(rule_id))
        .filter(association_rules::association_id.eq(association_id))
        .first::<AssociationRule>(conn)
        .optional()?;

    Ok(result)
}

/// Lists an association's rules, active rules first, newest first within each group
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn list_rules(pool: &DbPool, association_id: &str) -> Result<Vec<AssociationRule>> {
    let conn = &mut pool.get()?;

    let rows = association_rules::table
        .filter(association_rules::association_id.eq(association_id))
        .order(association_rules::is_active.desc())
        .then_order_by(association_rules::created_at.desc())
        .load::<AssociationRule>(conn)?;

    Ok(rows)
}

/// Editable rule fields; `None` means leave unchanged
#[derive(AsChangeset, Default)]
#[diesel(table_name = association_rules)]
pub struct RuleChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub config: Option<JsonValue>,
}

/// Updates a rule's editable fields
///
/// ### Errors
///
/// Returns an error if the rule does not exist in the association.
#[instrument(skip(pool, changeset), fields(association_id = %association_id, rule_id = %rule_id))]
pub fn update_rule(
    pool: &DbPool,
    association_id: &str,
    rule_id: &str,
    changeset: RuleChangeset,
) -> Result<AssociationRule> {
    debug!("Updating association rule");

    let _existing = get_rule(pool, association_id, rule_id)?
        .ok_or_else(|| anyhow!("Rule with id {} not found", rule_id))?;

    let conn = &mut pool.get()?;
    diesel::update(association_rules::table.find(rule_id.to_string()))
        .set((changeset, association_rules::updated_at.eq(Utc::now().naive_utc())))
        .execute(conn)?;
    drop(conn);

    let updated = get_rule(pool, association_id, rule_id)?
        .ok_or_else(|| anyhow!("Rule with id {} not found after update", rule_id))?;

    Ok(updated)
}

/// Deactivates a rule (rules are soft deleted, never removed)
#[instrument(skip(pool), fields(association_id = %association_id, rule_id = %rule_id))]
pub fn deactivate_rule(pool: &DbPool, association_id: &str, rule_id: &str) -> Result<()> {
    let _existing = get_rule(pool, association_id, rule_id)?
        .ok_or_else(|| anyhow!("Rule with id {} not found", rule_id))?;

    let conn = &mut pool.get()?;
    diesel::update(association_rules::table.find(rule_id.to_string()))
        .set((
            association_rules::is_active.eq(false),
            association_rules::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)?;

    info!("Rule {} deactivated", rule_id);

    Ok(())
}
