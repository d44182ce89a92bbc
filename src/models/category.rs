use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TransactionKind;

/// A budget category owned by an association, e.g. "Ice Rental"
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    id: String,
    association_id: String,
    name: String,
    /// Grouping heading shown on dashboards, e.g. "Facilities"
    heading: String,
    /// Display color (hex string)
    color: String,
    kind: TransactionKind,
    created_at: NaiveDateTime,
}

impl Category {
    pub fn new(
        association_id: &str,
        name: String,
        heading: String,
        color: String,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            association_id: association_id.to_string(),
            name,
            heading,
            color,
            kind,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_association_id(&self) -> String {
        self.association_id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_heading(&self) -> String {
        self.heading.clone()
    }

    pub fn get_color(&self) -> String {
        self.color.clone()
    }

    pub fn get_kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
