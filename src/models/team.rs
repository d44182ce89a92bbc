use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The operational team entity carrying the season budget total
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::teams)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Team {
    id: String,
    name: String,
    level: String,
    season: String,
    budget_total: f64,
    created_at: NaiveDateTime,
}

impl Team {
    pub fn new(name: String, level: String, season: String, budget_total: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            level,
            season,
            budget_total,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_level(&self) -> String {
        self.level.clone()
    }

    pub fn get_season(&self) -> String {
        self.season.clone()
    }

    pub fn get_budget_total(&self) -> f64 {
        self.budget_total
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
