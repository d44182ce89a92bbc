use crate::db::DbPool;
use crate::models::Alert;
use crate::schema::alerts;
use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Persists an alert
#[instrument(skip(pool, alert), fields(alert_type = %alert.get_alert_type()))]
pub fn create_alert(pool: &DbPool, alert: &Alert) -> Result<()> {
    debug!("Creating alert");

    let conn = &mut pool.get()?;
    diesel::insert_into(alerts::table).values(alert).execute(conn)?;

    Ok(())
}

/// Retrieves an alert by ID, scoped to an association
#[instrument(skip(pool), fields(association_id = %association_id, alert_id = %alert_id))]
pub fn get_alert(pool: &DbPool, association_id: &str, alert_id: &str) -> Result<Option<Alert>> {
    let conn = &mut pool.get()?;

    let result = alerts::table
        .filter(alerts::id.eq(alert_id))
        .filter(alerts::association_id.eq(association_id))
        .first::<Alert>(conn)
        .optional()?;

    Ok(result)
}

/// Lists a team's unresolved stored alerts, newest first
#[instrument(skip(pool), fields(association_team_id = %association_team_id))]
pub fn unresolved_alerts_for_team(pool: &DbPool, association_team_id: &str) -> Result<Vec<Alert>> {
    let conn = &mut pool.get()?;

    let rows = alerts::table
        .filter(alerts::association_team_id.eq(association_team_id))
        .filter(alerts::resolved_at.is_null())
        .order(alerts::created_at.desc())
        .load::<Alert>(conn)?;

    Ok(rows)
}

/// Lists an association's unresolved alerts that are not tied to any team
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn unresolved_association_level_alerts(pool: &DbPool, association_id: &str) -> Result<Vec<Alert>> {
    let conn = &mut pool.get()?;

    let rows = alerts::table
        .filter(alerts::association_id.eq(association_id))
        .filter(alerts::association_team_id.is_null())
        .filter(alerts::resolved_at.is_null())
        .order(alerts::created_at.desc())
        .load::<Alert>(conn)?;

    Ok(rows)
}

/// Lists an association's recent unresolved alerts for the feed
///
/// Only alerts raised within the past seven days are shown, capped at the
/// ten newest.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn recent_unresolved_alerts(pool: &DbPool, association_id: &str) -> Result<Vec<Alert>> {
    let conn = &mut pool.get()?;

    let since = (Utc::now() - Duration::days(7)).naive_utc();

    let rows = alerts::table
        .filter(alerts::association_id.eq(association_id))
        .filter(alerts::resolved_at.is_null())
        .filter(alerts::created_at.ge(since))
        .order(alerts::created_at.desc())
        .limit(10)
        .load::<Alert>(conn)?;

    Ok(rows)
}

/// Marks an alert resolved
///
/// ### Errors
///
/// Returns an error if the alert does not exist in the association.
#[instrument(skip(pool), fields(association_id = %association_id, alert_id = %alert_id))]
pub fn resolve_alert(pool: &DbPool, association_id: &str, alert_id: &str) -> Result<Alert> {
    let _existing = get_alert(pool, association_id, alert_id)?
        .ok_or_else(|| anyhow!("Alert with id {} not found", alert_id))?;

    let conn = &mut pool.get()?;
    diesel::update(alerts::table.find(alert_id.to_string()))
        .set(alerts::resolved_at.eq(Utc::now().naive_utc()))
        .execute(conn)?;
    drop(conn);

    info!("Alert {} resolved", alert_id);

    let updated = get_alert(pool, association_id, alert_id)?
        .ok_or_else(|| anyhow!("Alert with id {} not found after update", alert_id))?;

    Ok(updated)
}

/// Marks an alert acknowledged
///
/// Acknowledging is idempotent on the feed side but the timestamp records
/// the first acknowledgement only if none was set.
#[instrument(skip(pool), fields(association_id = %association_id, alert_id = %alert_id))]
pub fn acknowledge_alert(pool: &DbPool, association_id: &str, alert_id: &str) -> Result<Alert> {
    let existing = get_alert(pool, association_id, alert_id)?
        .ok_or_else(|| anyhow!("Alert with id {} not found", alert_id))?;

    if existing.get_acknowledged_at().is_none() {
        let conn = &mut pool.get()?;
        diesel::update(alerts::table.find(alert_id.to_string()))
            .set(alerts::acknowledged_at.eq(Utc::now().naive_utc()))
            .execute(conn)?;
    }

    let updated = get_alert(pool, association_id, alert_id)?
        .ok_or_else(|| anyhow!("Alert with id {} not found after update", alert_id))?;

    Ok(updated)
}
