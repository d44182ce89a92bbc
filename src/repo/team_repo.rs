use crate::db::DbPool;
use crate::models::{AssociationTeam, Team};
use crate::schema::{association_teams, teams};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, instrument};

/// Creates a team
#[instrument(skip(pool, team), fields(name = %team.get_name()))]
pub fn create_team(pool: &DbPool, team: &Team) -> Result<()> {
    debug!("Creating team");

    let conn = &mut pool.get()?;
    diesel::insert_into(teams::table).values(team).execute(conn)?;

    Ok(())
}

/// Retrieves a team by ID
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn get_team(pool: &DbPool, team_id: &str) -> Result<Option<Team>> {
    let conn = &mut pool.get()?;

    let result = teams::table
        .filter(teams::id.eq(team_id))
        .first::<Team>(conn)
        .optional()?;

    Ok(result)
}

/// Registers a team with an association
#[instrument(skip(pool, association_team), fields(team_name = %association_team.get_team_name()))]
pub fn create_association_team(pool: &DbPool, association_team: &AssociationTeam) -> Result<()> {
    debug!("Creating association team");

    let conn = &mut pool.get()?;
    diesel::insert_into(association_teams::table)
        .values(association_team)
        .execute(conn)?;

    Ok(())
}

/// Retrieves an association team by ID, scoped to an association
///
/// The scoping keeps one tenant from addressing another tenant's teams.
#[instrument(skip(pool), fields(association_id = %association_id, association_team_id = %association_team_id))]
pub fn get_association_team(
    pool: &DbPool,
    association_id: &str,
    association_team_id: &str,
) -> Result<Option<AssociationTeam>> {
    let conn = &mut pool.get()?;

    let result = association_teams::table
        .filter(association_teams::id.eq(association_team_id))
        .filter(association_teams::association_id.eq(association_id))
        .first::<AssociationTeam>(conn)
        .optional()?;

    Ok(result)
}

/// Lists an association's active teams ordered by team name
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn list_active_association_teams(
    pool: &DbPool,
    association_id: &str,
) -> Result<Vec<AssociationTeam>> {
    let conn = &mut pool.get()?;

    let rows = association_teams::table
        .filter(association_teams::association_id.eq(association_id))
        .filter(association_teams::is_active.eq(true))
        .order(association_teams::team_name.asc())
        .load::<AssociationTeam>(conn)?;

    Ok(rows)
}

/// Lists all of an association's teams, active or not (used by reports)
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn list_association_teams(pool: &DbPool, association_id: &str) -> Result<Vec<AssociationTeam>> {
    let conn = &mut pool.get()?;

    let rows = association_teams::table
        .filter(association_teams::association_id.eq(association_id))
        .order(association_teams::team_name.asc())
        .load::<AssociationTeam>(conn)?;

    Ok(rows)
}
