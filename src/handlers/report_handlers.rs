use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::db::DbPool;
use crate::dto::ReportsData;
use crate::errors::ApiError;
use crate::reports;

use super::association_handlers::require_association;

/// Handler for the reports page payload
///
/// This function handles GET requests to `/associations/{id}/reports`:
/// season financial rows, transaction detail rows, and alert report rows.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub async fn reports_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
) -> Result<Json<ReportsData>, ApiError> {
    debug!("Building reports");

    require_association(&pool, &association_id)?;

    let season = reports::build_season_report(&pool, &association_id).map_err(ApiError::Database)?;
    let transactions =
        reports::build_transaction_report(&pool, &association_id).map_err(ApiError::Database)?;
    let alerts = reports::build_alert_report(&pool, &association_id).map_err(ApiError::Database)?;

    Ok(Json(ReportsData { season, transactions, alerts }))
}

fn csv_response(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

/// Handler for the season financial CSV export
///
/// This function handles GET requests to
/// `/associations/{id}/reports/season.csv`.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub async fn season_csv_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_association(&pool, &association_id)?;
    let rows = reports::build_season_report(&pool, &association_id).map_err(ApiError::Database)?;
    Ok(csv_response("season-report.csv", reports::season_report_csv(&rows)))
}

/// Handler for the transaction detail CSV export
///
/// This function handles GET requests to
/// `/associations/{id}/reports/transactions.csv`.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub async fn transactions_csv_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_association(&pool, &association_id)?;
    let rows = reports::build_transaction_report(&pool, &association_id).map_err(ApiError::Database)?;
    Ok(csv_response("transactions-report.csv", reports::transaction_report_csv(&rows)))
}

/// Handler for the alert CSV export
///
/// This function handles GET requests to
/// `/associations/{id}/reports/alerts.csv`.
#[instrument(skip(pool), fields(association_id = %association_id))]
pub async fn alerts_csv_handler(
    State(pool): State<Arc<DbPool>>,
    Path(association_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_association(&pool, &association_id)?;
    let rows = reports::build_alert_report(&pool, &association_id).map_err(ApiError::Database)?;
    Ok(csv_response("alerts-report.csv", reports::alert_report_csv(&rows)))
}
