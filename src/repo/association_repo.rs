use crate::db::DbPool;
use crate::models::{Association, AssociationUser, DashboardConfig, JsonValue};
use crate::schema::{association_users, associations, dashboard_configs};
use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates an association together with its admin user, board members and
/// dashboard config in a single transaction
///
/// This is the onboarding wizard's final submission: either the whole tenant
/// comes into existence or none of it does.
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - Any of the inserts fail (the transaction is rolled back)
#[instrument(skip_all, fields(name = %association.get_name()))]
pub fn onboard_association(
    pool: &DbPool,
    association: &Association,
    users: &[AssociationUser],
    config: &DashboardConfig,
) -> Result<()> {
    debug!("Creating association with {} users", users.len());

    let conn = &mut pool.get()?;
    conn.transaction::<_, anyhow::Error, _>(|conn| {
        diesel::insert_into(associations::table)
            .values(association)
            .execute(conn)?;

        diesel::insert_into(association_users::table)
            .values(users)
            .execute(conn)?;

        diesel::insert_into(dashboard_configs::table)
            .values(config)
            .execute(conn)?;

        Ok(())
    })?;

    info!("Successfully onboarded association with id: {}", association.get_id());
    Ok(())
}

/// Retrieves an association by its ID
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn get_association(pool: &DbPool, association_id: &str) -> Result<Option<Association>> {
    let conn = &mut pool.get()?;

    let result = associations::table
        .filter(associations::id.eq(association_id))
        .first::<Association>(conn)
        .optional()?;

    Ok(result)
}

/// Looks up an association by its (unique) display name
///
/// Used by onboarding to reject duplicate association names.
#[instrument(skip(pool))]
pub fn find_association_by_name(pool: &DbPool, name: &str) -> Result<Option<Association>> {
    let conn = &mut pool.get()?;

    let result = associations::table
        .filter(associations::name.eq(name))
        .first::<Association>(conn)
        .optional()?;

    Ok(result)
}

/// Partial update of association detail fields
///
/// Only fields that are `Some` are written; `updated_at` is always bumped.
#[derive(AsChangeset, Default)]
#[diesel(table_name = associations)]
pub struct AssociationChangeset {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub province_state: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub season: Option<String>,
    pub logo_url: Option<String>,
    pub pre_season_budget_deadline: Option<NaiveDateTime>,
    pub pre_season_budgets_required: Option<i32>,
    pub pre_season_budget_auto_approve: Option<bool>,
}

/// Updates an association's detail fields by ID
///
/// ### Errors
///
/// Returns an error if the association does not exist or the update fails.
#[instrument(skip(pool, changeset), fields(association_id = %association_id))]
pub fn update_association(
    pool: &DbPool,
    association_id: &str,
    changeset: AssociationChangeset,
) -> Result<Association> {
    debug!("Updating association");

    let _existing = get_association(pool, association_id)?
        .ok_or_else(|| anyhow::anyhow!("Association with id {} not found", association_id))?;

    let conn = &mut pool.get()?;
    diesel::update(associations::table.find(association_id.to_string()))
        .set((changeset, associations::updated_at.eq(Utc::now().naive_utc())))
        .execute(conn)?;

    let updated = get_association(pool, association_id)?
        .ok_or_else(|| anyhow::anyhow!("Association with id {} not found after update", association_id))?;

    Ok(updated)
}

/// Receipt policy fields, updated as a unit by the receipt-policy endpoint
#[derive(AsChangeset)]
#[diesel(table_name = associations)]
pub struct ReceiptPolicyChangeset {
    pub receipts_enabled: bool,
    pub receipt_global_threshold_cents: i32,
    pub receipt_grace_period_days: i32,
    pub receipt_category_thresholds_enabled: bool,
    pub receipt_category_overrides: JsonValue,
    pub allowed_team_threshold_override: bool,
}

/// Replaces an association's receipt policy
#[instrument(skip(pool, policy), fields(association_id = %association_id))]
pub fn update_receipt_policy(
    pool: &DbPool,
    association_id: &str,
    policy: ReceiptPolicyChangeset,
) -> Result<Association> {
    debug!("Updating receipt policy");

    let conn = &mut pool.get()?;
    diesel::update(associations::table.find(association_id.to_string()))
        .set((policy, associations::updated_at.eq(Utc::now().naive_utc())))
        .execute(conn)?;
    drop(conn);

    let updated = get_association(pool, association_id)?
        .ok_or_else(|| anyhow::anyhow!("Association with id {} not found", association_id))?;

    Ok(updated)
}

/// Retrieves the dashboard config for an association
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn get_dashboard_config(pool: &DbPool, association_id: &str) -> Result<Option<DashboardConfig>> {
    let conn = &mut pool.get()?;

    let result = dashboard_configs::table
        .filter(dashboard_configs::association_id.eq(association_id))
        .first::<DashboardConfig>(conn)
        .optional()?;

    Ok(result)
}
