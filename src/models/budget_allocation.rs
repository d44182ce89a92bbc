use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Planned spend for one team/category/season combination
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::budget_allocations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetAllocation {
    id: String,
    team_id: String,
    category_id: String,
    season: String,
    allocated: f64,
    created_at: NaiveDateTime,
}

impl BudgetAllocation {
    pub fn new(team_id: &str, category_id: &str, season: String, allocated: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            team_id: team_id.to_string(),
            category_id: category_id.to_string(),
            season,
            allocated,
            created_at: Utc::now().naive_utc(),
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

    pub fn get_season(&self) -> String {
        self.season.clone()
    }

    pub fn get_allocated(&self) -> f64 {
        self.allocated
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
