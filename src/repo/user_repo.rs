use crate::db::DbPool;
use crate::models::{AssociationUser, UserRole};
use crate::schema::association_users;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, instrument};

/// Adds a user to an association
#[instrument(skip(pool, user), fields(email = %user.get_email()))]
pub fn create_user(pool: &DbPool, user: &AssociationUser) -> Result<()> {
    debug!("Creating association user");

    let conn = &mut pool.get()?;
    diesel::insert_into(association_users::table)
        .values(user)
        .execute(conn)?;

    Ok(())
}

/// Retrieves a user by ID
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<AssociationUser>> {
    let conn = &mut pool.get()?;

    let result = association_users::table
        .filter(association_users::id.eq(user_id))
        .first::<AssociationUser>(conn)
        .optional()?;

    Ok(result)
}

/// Lists an association's users, oldest membership first
#[instrument(skip(pool), fields(association_id = %association_id))]
pub fn list_users(pool: &DbPool, association_id: &str) -> Result<Vec<AssociationUser>> {
    let conn = &mut pool.get()?;

    let users = association_users::table
        .filter(association_users::association_id.eq(association_id))
        .order(association_users::created_at.asc())
        .load::<AssociationUser>(conn)?;

    Ok(users)
}

/// Updates a user's role
///
/// ### Errors
///
/// Returns an error if the user does not exist.
#[instrument(skip(pool), fields(user_id = %user_id, role = %role))]
pub fn update_user_role(pool: &DbPool, user_id: &str, role: UserRole) -> Result<AssociationUser> {
    debug!("Updating user role");

    let _existing = get_user(pool, user_id)?
        .ok_or_else(|| anyhow::anyhow!("Association user with id {} not found", user_id))?;

    let conn = &mut pool.get()?;
    diesel::update(association_users::table.find(user_id.to_string()))
        .set(association_users::role.eq(role))
        .execute(conn)?;
    drop(conn);

    let updated = get_user(pool, user_id)?
        .ok_or_else(|| anyhow::anyhow!("Association user with id {} not found after update", user_id))?;

    Ok(updated)
}
