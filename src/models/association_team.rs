use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership of a team in an association
///
/// Carries the association-facing metadata (display name, division,
/// treasurer contact) separately from the operational `Team` row. The
/// `team_id` link is nullable: an association can register a team before the
/// team itself is connected.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::association_teams)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssociationTeam {
    id: String,
    association_id: String,
    team_id: Option<String>,
    team_name: String,
    division: Option<String>,
    season: Option<String>,
    treasurer_name: Option<String>,
    treasurer_email: Option<String>,
    is_active: bool,
    connected_at: Option<NaiveDateTime>,
    last_synced_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl AssociationTeam {
    pub fn new(association_id: &str, team_id: Option<String>, team_name: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            association_id: association_id.to_string(),
            connected_at: team_id.as_ref().map(|_| now),
            team_id,
            team_name,
            division: None,
            season: None,
            treasurer_name: None,
            treasurer_email: None,
            is_active: true,
            last_synced_at: None,
            created_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_association_id(&self) -> String {
        self.association_id.clone()
    }

    pub fn get_team_id(&self) -> Option<String> {
        self.team_id.clone()
    }

    pub fn get_team_name(&self) -> String {
        self.team_name.clone()
    }

    pub fn get_division(&self) -> Option<String> {
        self.division.clone()
    }

    pub fn set_division(&mut self, division: Option<String>) {
        self.division = division;
    }

    pub fn get_season(&self) -> Option<String> {
        self.season.clone()
    }

    pub fn set_season(&mut self, season: Option<String>) {
        self.season = season;
    }

    pub fn get_treasurer_name(&self) -> Option<String> {
        self.treasurer_name.clone()
    }

    pub fn get_treasurer_email(&self) -> Option<String> {
        self.treasurer_email.clone()
    }

    pub fn set_treasurer(&mut self, name: Option<String>, email: Option<String>) {
        self.treasurer_name = name;
        self.treasurer_email = email;
    }

    pub fn get_is_active(&self) -> bool {
        self.is_active
    }

    pub fn set_is_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    pub fn get_connected_at(&self) -> Option<DateTime<Utc>> {
        self.connected_at
            .map(|ts| DateTime::from_naive_utc_and_offset(ts, Utc))
    }

    pub fn get_last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
            .map(|ts| DateTime::from_naive_utc_and_offset(ts, Utc))
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
