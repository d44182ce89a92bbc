use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::alerts::{self, NormalizedAlert};
use crate::db::DbPool;
use crate::errors::ApiError;
use crate::models::Alert;
use crate::repo;

use super::association_handlers::require_association;

/// Handler for the association's full alert feed
///
/// This function handles GET requests to `/associations/{id}/alerts`. The
/// feed merges stored alerts with alerts synthesized from transactions and
/// the latest snapshots, newest first.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub async fn alert_feed_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
) -> Result<Json<Vec<NormalizedAlert>>, ApiError> {
    debug!("Building association alert feed");

    require_association(&pool, &association_id)?;
    let feed = alerts::build_association_alerts(&pool, &association_id).map_err(ApiError::Database)?;
    Ok(Json(feed))
}

/// Handler for resolving a stored alert
///
/// This function handles POST requests to
/// `/associations/{id}/alerts/{alert_id}/resolve`. Only stored alerts can be
/// resolved; synthesized feed entries disappear when their source clears.
#[instrument(skip(pool), fields(association_id = %association_id, alert_id = %alert_id))]
pub async fn resolve_alert_handler(
    State(pool): State<Arc<DbPool>>,
    Path((association_id, alert_id)): Path<(String, String)>,
) -> Result<Json<Alert>, ApiError> {
    require_association(&pool, &association_id)?;

    let _existing = repo::get_alert(&pool, &association_id, &alert_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let resolved = repo::resolve_alert(&pool, &association_id, &alert_id).map_err(ApiError::Database)?;
    info!("Alert {} resolved", alert_id);
    Ok(Json(resolved))
}

/// Handler for acknowledging a stored alert
///
/// This function handles POST requests to
/// `/associations/{id}/alerts/{alert_id}/acknowledge`.
#[instrument(skip(pool), fields(association_id = %association_id, alert_id = %alert_id))]
pub async fn acknowledge_alert_handler(
    State(pool): State<Arc<DbPool>>,
    Path((association_id, alert_id)): Path<(String, String)>,
) -> Result<Json<Alert>, ApiError> {
    require_association(&pool, &association_id)?;

    let _existing = repo::get_alert(&pool, &association_id, &alert_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound)?;

    let acknowledged =
        repo::acknowledge_alert(&pool, &association_id, &alert_id).map_err(ApiError::Database)?;
    Ok(Json(acknowledged))
}
