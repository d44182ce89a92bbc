use crate::db::DbPool;
use crate::models::{Transaction, TransactionKind, TransactionStatus};
use crate::schema::transactions;
use anyhow::{Result, anyhow};
use chrono::{NaiveDateTime, Utc};
use diesel::dsl::sum;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a transaction (always starts PENDING)
#[instrument(skip(pool, transaction), fields(team_id = %transaction.get_team_id(), vendor = %transaction.get_vendor()))]
pub fn create_transaction(pool: &DbPool, transaction: &Transaction) -> Result<()> {
    debug!("Creating transaction");

    let conn = &mut pool.get()?;
    diesel::insert_into(transactions::table)
        .values(transaction)
        .execute(conn)?;

    Ok(())
}

/// Retrieves a transaction by ID (soft-deleted rows are not returned)
#[instrument(skip(pool), fields(transaction_id = %transaction_id))]
pub fn get_transaction(pool: &DbPool, transaction_id: &str) -> Result<Option<Transaction>> {
    let conn = &mut pool.get()?;

    let result = transactions::table
        .filter(transactions::id.eq(transaction_id))
        .filter(transactions::deleted_at.is_null())
        .first::<Transaction>(conn)
        .optional()?;

    Ok(result)
}

/// Lists a team's transactions, newest transaction date first
///
/// An optional status filter narrows the listing; soft-deleted rows are
/// always excluded.
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn list_team_transactions(
    pool: &DbPool,
    team_id: &str,
    status: Option<TransactionStatus>,
) -> Result<Vec<Transaction>> {
    let conn = &mut pool.get()?;

    let mut query = transactions::table
        .filter(transactions::team_id.eq(team_id))
        .filter(transactions::deleted_at.is_null())
        .order(transactions::transaction_date.desc())
        .into_boxed();

    if let Some(status) = status {
        query = query.filter(transactions::status.eq(status));
    }

    let rows = query.load::<Transaction>(conn)?;
    Ok(rows)
}

/// Lists a team's most recent approved transactions
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn recent_approved_transactions(
    pool: &DbPool,
    team_id: &str,
    limit: i64,
) -> Result<Vec<Transaction>> {
    let conn = &mut pool.get()?;

    let rows = transactions::table
        .filter(transactions::team_id.eq(team_id))
        .filter(transactions::deleted_at.is_null())
        .filter(transactions::status.eq(TransactionStatus::Approved))
        .order(transactions::transaction_date.desc())
        .limit(limit)
        .load::<Transaction>(conn)?;

    Ok(rows)
}

/// Lists a team's pending transactions, newest first (by creation time)
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn pending_transactions(pool: &DbPool, team_id: &str, limit: Option<i64>) -> Result<Vec<Transaction>> {
    let conn = &mut pool.get()?;

    let mut query = transactions::table
        .filter(transactions::team_id.eq(team_id))
        .filter(transactions::deleted_at.is_null())
        .filter(transactions::status.eq(TransactionStatus::Pending))
        .order(transactions::created_at.desc())
        .into_boxed();

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let rows = query.load::<Transaction>(conn)?;
    Ok(rows)
}

/// Lists a team's approved transactions that are missing a receipt
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn approved_missing_receipt_transactions(
    pool: &DbPool,
    team_id: &str,
    limit: i64,
) -> Result<Vec<Transaction>> {
    let conn = &mut pool.get()?;

    let rows = transactions::table
        .filter(transactions::team_id.eq(team_id))
        .filter(transactions::deleted_at.is_null())
        .filter(transactions::status.eq(TransactionStatus::Approved))
        .filter(transactions::missing_receipt.eq(true))
        .order(transactions::transaction_date.desc())
        .limit(limit)
        .load::<Transaction>(conn)?;

    Ok(rows)
}

/// Sums a team's approved expense amounts, optionally per category
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn approved_expense_total(
    pool: &DbPool,
    team_id: &str,
    category_id: Option<&str>,
) -> Result<f64> {
    let conn = &mut pool.get()?;

    let mut query = transactions::table
        .filter(transactions::team_id.eq(team_id))
        .filter(transactions::deleted_at.is_null())
        .filter(transactions::status.eq(TransactionStatus::Approved))
        .filter(transactions::kind.eq(TransactionKind::Expense))
        .into_boxed();

    if let Some(category_id) = category_id {
        query = query.filter(transactions::category_id.eq(category_id.to_string()));
    }

    let total = query
        .select(sum(transactions::amount))
        .first::<Option<f64>>(conn)?;

    Ok(total.unwrap_or(0.0))
}

/// Sums a team's pending transaction amounts
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn pending_total(pool: &DbPool, team_id: &str) -> Result<f64> {
    let conn = &mut pool.get()?;

    let total = transactions::table
        .filter(transactions::team_id.eq(team_id))
        .filter(transactions::deleted_at.is_null())
        .filter(transactions::status.eq(TransactionStatus::Pending))
        .select(sum(transactions::amount))
        .first::<Option<f64>>(conn)?;

    Ok(total.unwrap_or(0.0))
}

/// Counts a team's pending transactions
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn pending_count(pool: &DbPool, team_id: &str) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = transactions::table
        .filter(transactions::team_id.eq(team_id))
        .filter(transactions::deleted_at.is_null())
        .filter(transactions::status.eq(TransactionStatus::Pending))
        .count()
        .get_result::<i64>(conn)?;

    Ok(count)
}

/// Counts a team's transactions missing receipts (pending or approved)
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn missing_receipt_count(pool: &DbPool, team_id: &str) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = transactions::table
        .filter(transactions::team_id.eq(team_id))
        .filter(transactions::deleted_at.is_null())
        .filter(transactions::missing_receipt.eq(true))
        .filter(transactions::status.ne(TransactionStatus::Rejected))
        .count()
        .get_result::<i64>(conn)?;

    Ok(count)
}

/// The moment of a team's most recent transaction entry, if any
#[instrument(skip(pool), fields(team_id = %team_id))]
pub fn last_activity_at(pool: &DbPool, team_id: &str) -> Result<Option<NaiveDateTime>> {
    let conn = &mut pool.get()?;

    let latest = transactions::table
        .filter(transactions::team_id.eq(team_id))
        .filter(transactions::deleted_at.is_null())
        .select(diesel::dsl::max(transactions::created_at))
        .first::<Option<NaiveDateTime>>(conn)?;

    Ok(latest)
}

/// Editable transaction fields; `None` means leave unchanged
#[derive(AsChangeset, Default)]
#[diesel(table_name = transactions)]
pub struct TransactionChangeset {
    pub category_id: Option<String>,
    pub amount: Option<f64>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub receipt_url: Option<String>,
    pub missing_receipt: Option<bool>,
    pub transaction_date: Option<NaiveDateTime>,
}

/// Updates a transaction's editable fields
///
/// Attaching a receipt URL clears the missing-receipt flag as a side effect.
#[instrument(skip(pool, changeset), fields(transaction_id = %transaction_id))]
pub fn update_transaction(
    pool: &DbPool,
    transaction_id: &str,
    mut changeset: TransactionChangeset,
) -> Result<Transaction> {
    debug!("Updating transaction");

    let _existing = get_transaction(pool, transaction_id)?
        .ok_or_else(|| anyhow!("Transaction with id {} not found", transaction_id))?;

    if changeset.receipt_url.is_some() {
        changeset.missing_receipt = Some(false);
    }

    let conn = &mut pool.get()?;
    diesel::update(transactions::table.find(transaction_id.to_string()))
        .set((changeset, transactions::updated_at.eq(Utc::now().naive_utc())))
        .execute(conn)?;
    drop(conn);

    let updated = get_transaction(pool, transaction_id)?
        .ok_or_else(|| anyhow!("Transaction with id {} not found after update", transaction_id))?;

    Ok(updated)
}

/// Reviews a pending transaction, moving it to APPROVED or REJECTED
///
/// ### Errors
///
/// Returns an error if the transaction does not exist or is not PENDING:
/// reviewed transactions are terminal.
#[instrument(skip(pool), fields(transaction_id = %transaction_id, status = %new_status))]
pub fn review_transaction(
    pool: &DbPool,
    transaction_id: &str,
    new_status: TransactionStatus,
) -> Result<Transaction> {
    let existing = get_transaction(pool, transaction_id)?
        .ok_or_else(|| anyhow!("Transaction with id {} not found", transaction_id))?;

    if !existing.get_status().can_transition_to(new_status) {
        return Err(anyhow!(
            "Cannot move transaction from {} to {}",
            existing.get_status(),
            new_status
        ));
    }

    let conn = &mut pool.get()?;
    diesel::update(transactions::table.find(transaction_id.to_string()))
        .set((
            transactions::status.eq(new_status),
            transactions::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)?;
    drop(conn);

    info!("Transaction {} reviewed as {}", transaction_id, new_status);

    let updated = get_transaction(pool, transaction_id)?
        .ok_or_else(|| anyhow!("Transaction with id {} not found after review", transaction_id))?;

    Ok(updated)
}

/// Soft deletes a transaction
#[instrument(skip(pool), fields(transaction_id = %transaction_id))]
pub fn delete_transaction(pool: &DbPool, transaction_id: &str) -> Result<()> {
    debug!("Soft deleting transaction");

    let conn = &mut pool.get()?;
    diesel::update(transactions::table.find(transaction_id.to_string()))
        .set(transactions::deleted_at.eq(Utc::now().naive_utc()))
        .execute(conn)?;

    Ok(())
}
