use crate::db::DbPool;
use crate::models::{BudgetAllocation, Category};
use crate::schema::{budget_allocations, categories};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, instrument};

/// Creates a budget category for an association
#[instrument(skip(pool, category), fields(name = %category.get_name()))]
pub fn create_category(pool: &DbPool, category: &Category) -> Result<()> {
    debug!("Creating category");

    let conn = &mut pool.get()?;
    diesel::insert_into(categories::table)
        .values(category)
        .execute(conn)?;

    Ok(())
}

/// Retrieves a category by ID
#[instrument(skip(pool), fields(category_id = %category_id))]
pub fn get_category(pool: &DbPool, category_id: &str) -> Result<Option<Category>> {
    let conn = &mut pool.get()?;

    let result = categories::table
        .filter(categories::id.eq(category_id))
        .first::<Category>(conn)
        .optional()?;

    Ok(result)
}

/// Lists an association's categories ordered by name
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn list_categories(pool: &DbPool, association_id: &str) -> Result<Vec<Category>> {
    let conn = &mut pool.get()?;

    let rows = categories::table
        .filter(categories::association_id.eq(association_id))
        .order(categories::name.asc())
        .load::<Category>(conn)?;

    Ok(rows)
}

/// Returns the subset of `category_ids` that belong to the association
///
/// The receipt-policy endpoint uses this to reject override keys referencing
/// categories the association does not own.
#[instrument(skip(pool, category_ids), fields(association_id = %association_id))]
pub fn existing_category_ids(
    pool: &DbPool,
    association_id: &str,
    category_ids: &[String],
) -> Result<Vec<String>> {
    let conn = &mut pool.get()?;

    let ids = categories::table
        .filter(categories::association_id.eq(association_id))
        .filter(categories::id.eq_any(category_ids))
        .select(categories::id)
        .load::<String>(conn)?;

    Ok(ids)
}

/// Creates a budget allocation for a team/category/season
#[instrument(skip(pool, allocation), fields(team_id = %allocation.get_team_id()))]
pub fn create_allocation(pool: &DbPool, allocation: &BudgetAllocation) -> Result<()> {
    debug!("Creating budget allocation");

    let conn = &mut pool.get()?;
    diesel::insert_into(budget_allocations::table)
        .values(allocation)
        .execute(conn)?;

    Ok(())
}

/// Lists a team's budget allocations for a season, joined to their categories
#[instrument(skip(pool), fields(team_id = %team_id, season = %season))]
pub fn list_allocations_with_categories(
    pool: &DbPool,
    team_id: &str,
    season: &str,
) -> Result<Vec<(BudgetAllocation, Category)>> {
    let conn = &mut pool.get()?;

    let rows = budget_allocations::table
        .inner_join(categories::table)
        .filter(budget_allocations::team_id.eq(team_id))
        .filter(budget_allocations::season.eq(season))
        .select((BudgetAllocation::as_select(), Category::as_select()))
        .load::<(BudgetAllocation, Category)>(conn)?;

    Ok(rows)
}
