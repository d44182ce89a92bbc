use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TransactionKind, TransactionStatus};

/// An expense or income record for a team
///
/// New transactions always start PENDING; review moves them to APPROVED or
/// REJECTED. `missing_receipt` is derived from the absence of a receipt URL
/// and kept in sync whenever the URL changes.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Transaction {
    id: String,
    team_id: String,
    category_id: String,
    kind: TransactionKind,
    status: TransactionStatus,
    amount: f64,
    vendor: String,
    description: Option<String>,
    receipt_url: Option<String>,
    missing_receipt: bool,
    creator_name: Option<String>,
    creator_email: String,
    transaction_date: NaiveDateTime,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    /// Soft-delete marker; deleted rows are excluded from every listing
    deleted_at: Option<NaiveDateTime>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        team_id: &str,
        category_id: &str,
        kind: TransactionKind,
        amount: f64,
        vendor: String,
        description: Option<String>,
        receipt_url: Option<String>,
        creator_name: Option<String>,
        creator_email: String,
        transaction_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            team_id: team_id.to_string(),
            category_id: category_id.to_string(),
            kind,
            status: TransactionStatus::Pending,
            amount,
            vendor,
            description,
            missing_receipt: receipt_url.is_none(),
            receipt_url,
            creator_name,
            creator_email,
            transaction_date: transaction_date.naive_utc(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_team_id(&self) -> String {
        self.team_id.clone()
    }

    pub fn get_category_id(&self) -> String {
        self.category_id.clone()
    }

    pub fn get_kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn get_status(&self) -> TransactionStatus {
        self.status
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn get_vendor(&self) -> String {
        self.vendor.clone()
    }

    pub fn get_description(&self) -> Option<String> {
        self.description.clone()
    }

    pub fn get_receipt_url(&self) -> Option<String> {
        self.receipt_url.clone()
    }

    pub fn get_missing_receipt(&self) -> bool {
        self.missing_receipt
    }

    pub fn get_creator_name(&self) -> Option<String> {
        self.creator_name.clone()
    }

    pub fn get_creator_email(&self) -> String {
        self.creator_email.clone()
    }

    pub fn get_transaction_date(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.transaction_date, Utc)
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
