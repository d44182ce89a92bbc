use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Severity;

/// A persisted alert raised for an association (optionally scoped to a team)
///
/// This is the stored stream; the alert feed endpoints additionally
/// synthesize alerts from snapshots and transactions on the fly.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::alerts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Alert {
    id: String,
    association_id: String,
    association_team_id: Option<String>,
    alert_type: String,
    title: String,
    severity: Severity,
    created_at: NaiveDateTime,
    acknowledged_at: Option<NaiveDateTime>,
    resolved_at: Option<NaiveDateTime>,
}

impl Alert {
    pub fn new(
        association_id: &str,
        association_team_id: Option<String>,
        alert_type: String,
        title: String,
        severity: Severity,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            association_id: association_id.to_string(),
            association_team_id,
            alert_type,
            title,
            severity,
            created_at: Utc::now().naive_utc(),
            acknowledged_at: None,
            resolved_at: None,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_association_id(&self) -> String {
        self.association_id.clone()
    }

    pub fn get_association_team_id(&self) -> Option<String> {
        self.association_team_id.clone()
    }

    pub fn get_alert_type(&self) -> String {
        self.alert_type.clone()
    }

    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_acknowledged_at(&self) -> Option<DateTime<Utc>> {
        self.acknowledged_at
            .map(|ts| DateTime::from_naive_utc_and_offset(ts, Utc))
    }

    pub fn get_resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
            .map(|ts| DateTime::from_naive_utc_and_offset(ts, Utc))
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}
