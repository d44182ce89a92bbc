use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserRole;

/// A role-scoped membership of a person in an association
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::association_users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssociationUser {
    id: String,
    association_id: String,
    email: String,
    name: Option<String>,
    role: UserRole,
    last_login_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl AssociationUser {
    pub fn new(association_id: &str, email: String, name: Option<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            association_id: association_id.to_string(),
            email,
            name,
            role,
            last_login_at: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_association_id(&self) -> String {
        self.association_id.clone()
    }

    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    pub fn get_name(&self) -> Option<String> {
        self.name.clone()
    }

    pub fn get_role(&self) -> UserRole {
        self.role
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
    }

    pub fn get_last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
            .map(|ts| DateTime::from_naive_utc_and_offset(ts, Utc))
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
