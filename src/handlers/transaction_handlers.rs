use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::db::DbPool;
use crate::dto::{CreateTransactionDto, TransactionQuery, UpdateTransactionDto};
use crate::errors::ApiError;
use crate::models::{Transaction, TransactionKind, TransactionStatus};
use crate::repo;

/// Handler for recording a new transaction
///
/// This function handles POST requests to `/teams/{team_id}/transactions`.
/// New transactions always start PENDING; `missing_receipt` is derived from
/// the absence of a receipt URL.
#[instrument(skip(pool, payload), fields(team_id = %team_id, vendor = %payload.vendor))]
pub async fn create_transaction_handler(
    State(pool): State<Arc<DbPool>>,
    Path(team_id): Path<String>,
    Json(payload): Json<CreateTransactionDto>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    info!("Creating transaction");

    let _team = repo::get_team(&pool, &team_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    if payload.amount <= 0.0 {
        return Err(ApiError::Validation("Amount must be positive".to_string()));
    }
    if payload.vendor.trim().is_empty() {
        return Err(ApiError::Validation("Vendor is required".to_string()));
    }
    let _category = repo::get_category(&pool, &payload.category_id)
        .map_err(ApiError::Database)?
        .ok_or_else(|| ApiError::Validation("Unknown category".to_string()))?;

    let transaction = Transaction::new(
        &team_id,
        &payload.category_id,
        payload.kind.unwrap_or(TransactionKind::Expense),
        payload.amount,
        payload.vendor,
        payload.description,
        payload.receipt_url,
        payload.creator_name,
        payload.creator_email,
        payload.transaction_date.unwrap_or_else(Utc::now),
    );
    repo::create_transaction(&pool, &transaction).map_err(ApiError::Database)?;

    info!("Created transaction with id: {}", transaction.get_id());
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Handler for listing a team's transactions
///
/// This function handles GET requests to `/teams/{team_id}/transactions`,
/// with an optional `?status=` filter. Soft-deleted rows never appear.
#[instrument(skip(pool, query), fields(team_id = %team_id))]
pub async fn list_transactions_handler(
    State(pool): State<Arc<DbPool>>,
    Path(team_id): Path<String>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    debug!("Listing transactions with filters: {:?}", query);

    let _team = repo::get_team(&pool, &team_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let status = match query.status {
        Some(raw) => Some(
            TransactionStatus::from_str(&raw)
                .map_err(|_| ApiError::Validation(format!("Unknown transaction status: {}", raw)))?,
        ),
        None => None,
    };

    let transactions =
        repo::list_team_transactions(&pool, &team_id, status).map_err(ApiError::Database)?;
    Ok(Json(transactions))
}

/// Handler for fetching one transaction
///
/// This function handles GET requests to `/transactions/{id}`.
#[instrument(skip(pool), fields(transaction_id = %transaction_id))]
pub async fn get_transaction_handler(
    State(pool): State<Arc<DbPool>>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = repo::get_transaction(&pool, &transaction_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(transaction))
}

/// Handler for editing a transaction's fields
///
/// This function handles PUT requests to `/transactions/{id}`.
#[instrument(skip(pool, payload), fields(transaction_id = %transaction_id))]
pub async fn update_transaction_handler(
    State(pool): State<Arc<DbPool>>,
    Path(transaction_id): Path<String>,
    Json(payload): Json<UpdateTransactionDto>,
) -> Result<Json<Transaction>, ApiError> {
    debug!("Updating transaction");

    let _existing = repo::get_transaction(&pool, &transaction_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    if let Some(amount) = payload.amount {
        if amount <= 0.0 {
            return Err(ApiError::Validation("Amount must be positive".to_string()));
        }
    }
    if let Some(ref category_id) = payload.category_id {
        repo::get_category(&pool, category_id)
            .map_err(ApiError::Database)?
            .ok_or_else(|| ApiError::Validation("Unknown category".to_string()))?;
    }

    let changeset = repo::TransactionChangeset {
        category_id: payload.category_id,
        amount: payload.amount,
        vendor: payload.vendor,
        description: payload.description,
        receipt_url: payload.receipt_url,
        missing_receipt: None,
        transaction_date: payload.transaction_date.map(|d| d.naive_utc()),
    };

    let updated =
        repo::update_transaction(&pool, &transaction_id, changeset).map_err(ApiError::Database)?;
    Ok(Json(updated))
}

/// Handler for removing a transaction
///
/// This function handles DELETE requests to `/transactions/{id}`. Removal is
/// a soft delete: the row keeps its history but drops out of all listings
/// and totals.
#[instrument(skip(pool), fields(transaction_id = %transaction_id))]
pub async fn delete_transaction_handler(
    State(pool): State<Arc<DbPool>>,
    Path(transaction_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _existing = repo::get_transaction(&pool, &transaction_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    repo::delete_transaction(&pool, &transaction_id).map_err(ApiError::Database)?;
    info!("Deleted transaction {}", transaction_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn review(
    pool: &DbPool,
    transaction_id: &str,
    new_status: TransactionStatus,
) -> Result<Json<Transaction>, ApiError> {
    let existing = repo::get_transaction(pool, transaction_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    if !existing.get_status().can_transition_to(new_status) {
        return Err(ApiError::Validation(format!(
            "Cannot move transaction from {} to {}",
            existing.get_status(),
            new_status
        )));
    }

    let updated =
        repo::review_transaction(pool, transaction_id, new_status).map_err(ApiError::Database)?;
    Ok(Json(updated))
}

/// Handler for approving a pending transaction
///
/// This function handles POST requests to `/transactions/{id}/approve`.
/// Only PENDING transactions may be reviewed.
#[instrument(skip(pool), fields(transaction_id = %transaction_id))]
pub async fn approve_transaction_handler(
    State(pool): State<Arc<DbPool>>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    review(&pool, &transaction_id, TransactionStatus::Approved).await
}

/// Handler for rejecting a pending transaction
///
/// This function handles POST requests to `/transactions/{id}/reject`.
#[instrument(skip(pool), fields(transaction_id = %transaction_id))]
pub async fn reject_transaction_handler(
    State(pool): State<Arc<DbPool>>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    review(&pool, &transaction_id, TransactionStatus::Rejected).await
}
