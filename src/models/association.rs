use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::JsonValue;

/// Represents an association, the tenant entity of the system
///
/// An association oversees a set of teams. It owns the receipt compliance
/// policy, pre-season budget settings, and (via `DashboardConfig`) the
/// thresholds used when computing team health snapshots.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::associations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Association {
    /// Unique identifier (UUID v4 as string)
    id: String,

    /// Display name, unique across the system
    name: String,

    abbreviation: Option<String>,
    province_state: Option<String>,
    country: Option<String>,

    /// ISO currency code, e.g. "CAD"
    currency: String,

    season: Option<String>,
    logo_url: Option<String>,

    /// Pre-season budget program settings
    pre_season_budget_deadline: Option<NaiveDateTime>,
    pre_season_budgets_required: Option<i32>,
    pre_season_budget_auto_approve: bool,

    /// Receipt compliance policy
    receipts_enabled: bool,
    receipt_global_threshold_cents: i32,
    receipt_grace_period_days: i32,
    receipt_category_thresholds_enabled: bool,
    /// Per-category threshold overrides, keyed by category id (cents values)
    receipt_category_overrides: JsonValue,
    allowed_team_threshold_override: bool,

    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Association {
    /// Creates a new association with default policy settings
    ///
    /// Receipt policy defaults: receipts enabled, $100.00 global threshold,
    /// 7 day grace period, no per-category thresholds.
    pub fn new(name: String, currency: String) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            abbreviation: None,
            province_state: None,
            country: None,
            currency,
            season: None,
            logo_url: None,
            pre_season_budget_deadline: None,
            pre_season_budgets_required: None,
            pre_season_budget_auto_approve: false,
            receipts_enabled: true,
            receipt_global_threshold_cents: 10_000,
            receipt_grace_period_days: 7,
            receipt_category_thresholds_enabled: false,
            receipt_category_overrides: JsonValue(json!({})),
            allowed_team_threshold_override: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.touch();
    }

    pub fn get_abbreviation(&self) -> Option<String> {
        self.abbreviation.clone()
    }

    pub fn set_abbreviation(&mut self, abbreviation: Option<String>) {
        self.abbreviation = abbreviation;
        self.touch();
    }

    pub fn get_province_state(&self) -> Option<String> {
        self.province_state.clone()
    }

    pub fn set_province_state(&mut self, province_state: Option<String>) {
        self.province_state = province_state;
        self.touch();
    }

    pub fn get_country(&self) -> Option<String> {
        self.country.clone()
    }

    pub fn set_country(&mut self, country: Option<String>) {
        self.country = country;
        self.touch();
    }

    pub fn get_currency(&self) -> String {
        self.currency.clone()
    }

    pub fn get_season(&self) -> Option<String> {
        self.season.clone()
    }

    pub fn set_season(&mut self, season: Option<String>) {
        self.season = season;
        self.touch();
    }

    pub fn get_logo_url(&self) -> Option<String> {
        self.logo_url.clone()
    }

    pub fn set_logo_url(&mut self, logo_url: Option<String>) {
        self.logo_url = logo_url;
        self.touch();
    }

    pub fn get_pre_season_budget_deadline(&self) -> Option<DateTime<Utc>> {
        self.pre_season_budget_deadline
            .map(|ts| DateTime::from_naive_utc_and_offset(ts, Utc))
    }

    pub fn get_pre_season_budgets_required(&self) -> Option<i32> {
        self.pre_season_budgets_required
    }

    pub fn get_pre_season_budget_auto_approve(&self) -> bool {
        self.pre_season_budget_auto_approve
    }

    /// Sets the pre-season budget program in one go, since the three fields
    /// only make sense together
    pub fn set_pre_season_budgets(
        &mut self,
        deadline: Option<DateTime<Utc>>,
        required: Option<i32>,
        auto_approve: bool,
    ) {
        self.pre_season_budget_deadline = deadline.map(|d| d.naive_utc());
        self.pre_season_budgets_required = required;
        self.pre_season_budget_auto_approve = auto_approve;
        self.touch();
    }

    pub fn get_receipts_enabled(&self) -> bool {
        self.receipts_enabled
    }

    pub fn get_receipt_global_threshold_cents(&self) -> i32 {
        self.receipt_global_threshold_cents
    }

    pub fn get_receipt_grace_period_days(&self) -> i32 {
        self.receipt_grace_period_days
    }

    pub fn get_receipt_category_thresholds_enabled(&self) -> bool {
        self.receipt_category_thresholds_enabled
    }

    pub fn get_receipt_category_overrides(&self) -> JsonValue {
        self.receipt_category_overrides.clone()
    }

    pub fn get_allowed_team_threshold_override(&self) -> bool {
        self.allowed_team_threshold_override
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().naive_utc();
    }
}
