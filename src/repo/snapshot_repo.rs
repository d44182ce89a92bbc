use crate::db::DbPool;
use crate::models::TeamSnapshot;
use crate::schema::team_snapshots;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, instrument};

/// Persists a snapshot. Snapshots are append-only.
#[instrument(skip(pool, snapshot), fields(association_team_id = %snapshot.get_association_team_id()))]
pub fn create_snapshot(pool: &DbPool, snapshot: &TeamSnapshot) -> Result<()> {
    debug!("Creating team snapshot");

    let conn = &mut pool.get()?;
    diesel::insert_into(team_snapshots::table)
        .values(snapshot)
        .execute(conn)?;

    Ok(())
}

/// Retrieves the latest snapshot for an association team
///
/// "Latest" means the greatest `snapshot_at`; the snapshot history is never
/// mutated, so this is the current financial picture.
#[instrument(skip(pool), fields(association_team_id = %association_team_id))]
pub fn latest_snapshot(pool: &DbPool, association_team_id: &str) -> Result<Option<TeamSnapshot>> {
    let conn = &mut pool.get()?;

    let result = team_snapshots::table
        .filter(team_snapshots::association_team_id.eq(association_team_id))
        .order(team_snapshots::snapshot_at.desc())
        .first::<TeamSnapshot>(conn)
        .optional()?;

    Ok(result)
}

/// Lists the most recent snapshots for an association team, newest first
#[instrument(skip(pool), fields(association_team_id = %association_team_id))]
pub fn list_snapshots(
    pool: &DbPool,
    association_team_id: &str,
    limit: i64,
) -> Result<Vec<TeamSnapshot>> {
    let conn = &mut pool.get()?;

    let rows = team_snapshots::table
        .filter(team_snapshots::association_team_id.eq(association_team_id))
        .order(team_snapshots::snapshot_at.desc())
        .limit(limit)
        .load::<TeamSnapshot>(conn)?;

    Ok(rows)
}
