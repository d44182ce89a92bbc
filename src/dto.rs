//! Request and response shapes for the HTTP surface
//!
//! Request DTOs deserialize straight from JSON bodies; response DTOs compose
//! models with derived data (snapshots, rollups, normalized alerts) so a
//! handler can return a whole page's worth of data in one payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::NormalizedAlert;
use crate::models::{
    Alert, Association, AssociationRule, AssociationTeam, AssociationUser, Category,
    DashboardConfig, Team, TeamSnapshot, Transaction, TransactionKind, UserRole,
};
use crate::reports::{AlertReportRow, SeasonFinancialRow, TransactionDetailRow};

/// A board member entry in the onboarding wizard
#[derive(Debug, Deserialize)]
pub struct BoardMemberDto {
    pub email: String,
    pub name: Option<String>,
    /// Defaults to `board_member` when omitted
    pub role: Option<UserRole>,
}

/// Dashboard threshold overrides in the onboarding wizard
///
/// Omitted fields fall back to the onboarding defaults (80/95 budget percent,
/// 30/60 bank days, 5/10 approvals, 21 inactivity days).
#[derive(Debug, Default, Deserialize)]
pub struct ThresholdsDto {
    pub budget_warning_pct: Option<f64>,
    pub budget_critical_pct: Option<f64>,
    pub bank_warning_days: Option<i32>,
    pub bank_critical_days: Option<i32>,
    pub approvals_warning_count: Option<i32>,
    pub approvals_critical_count: Option<i32>,
    pub inactivity_warning_days: Option<i32>,
}

/// The onboarding wizard's final submission
#[derive(Debug, Deserialize)]
pub struct OnboardAssociationDto {
    pub name: String,
    pub abbreviation: Option<String>,
    pub province_state: Option<String>,
    pub country: Option<String>,
    /// ISO currency code, defaults to CAD
    pub currency: Option<String>,
    pub season: Option<String>,
    pub admin_email: String,
    pub admin_name: Option<String>,
    #[serde(default)]
    pub board_members: Vec<BoardMemberDto>,
    pub thresholds: Option<ThresholdsDto>,
    pub pre_season_budget_deadline: Option<DateTime<Utc>>,
    pub pre_season_budgets_required: Option<i32>,
    #[serde(default)]
    pub pre_season_budget_auto_approve: bool,
}

/// Partial update of association detail fields
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAssociationDto {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub province_state: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub season: Option<String>,
    pub logo_url: Option<String>,
    pub pre_season_budget_deadline: Option<DateTime<Utc>>,
    pub pre_season_budgets_required: Option<i32>,
    pub pre_season_budget_auto_approve: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRoleDto {
    pub role: UserRole,
}

/// Receipt policy read/write shape
#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiptPolicyDto {
    pub receipts_enabled: bool,
    pub global_threshold_cents: i32,
    pub grace_period_days: i32,
    pub category_thresholds_enabled: bool,
    /// Per-category threshold overrides keyed by category id (cents)
    pub category_overrides: serde_json::Value,
    pub allowed_team_threshold_override: bool,
}

impl ReceiptPolicyDto {
    pub fn from_association(association: &Association) -> Self {
        Self {
            receipts_enabled: association.get_receipts_enabled(),
            global_threshold_cents: association.get_receipt_global_threshold_cents(),
            grace_period_days: association.get_receipt_grace_period_days(),
            category_thresholds_enabled: association.get_receipt_category_thresholds_enabled(),
            category_overrides: association.get_receipt_category_overrides().0,
            allowed_team_threshold_override: association.get_allowed_team_threshold_override(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRuleDto {
    pub rule_type: String,
    pub name: String,
    pub description: Option<String>,
    pub config: serde_json::Value,
    pub created_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRuleDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub config: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SetRuleActiveDto {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionDto {
    pub category_id: String,
    /// Defaults to EXPENSE
    pub kind: Option<TransactionKind>,
    pub amount: f64,
    pub vendor: String,
    pub description: Option<String>,
    pub receipt_url: Option<String>,
    pub creator_name: Option<String>,
    pub creator_email: String,
    /// Defaults to now
    pub transaction_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionDto {
    pub category_id: Option<String>,
    pub amount: Option<f64>,
    pub vendor: Option<String>,
    pub description: Option<String>,
    pub receipt_url: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Query string for transaction listings
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub status: Option<String>,
}

/// One team entry on the association overview
#[derive(Debug, Serialize)]
pub struct TeamOverviewData {
    pub association_team: AssociationTeam,
    pub team: Option<Team>,
    pub latest_snapshot: Option<TeamSnapshot>,
}

/// The association overview page payload
#[derive(Debug, Serialize)]
pub struct OverviewData {
    pub association: Association,
    pub teams: Vec<TeamOverviewData>,
    pub recent_alerts: Vec<Alert>,
}

/// Budget category rollup on the team detail page
#[derive(Debug, Serialize)]
pub struct CategoryRollupData {
    pub category: Category,
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percent_used: f64,
}

/// The team detail page payload
#[derive(Debug, Serialize)]
pub struct TeamDetailData {
    pub association_team: AssociationTeam,
    pub team: Option<Team>,
    pub latest_snapshot: Option<TeamSnapshot>,
    pub budget_categories: Vec<CategoryRollupData>,
    pub transactions: Vec<Transaction>,
    pub recent_approved: Vec<Transaction>,
    pub pending_transactions: Vec<Transaction>,
    pub alerts: Vec<NormalizedAlert>,
    pub snapshot_history: Vec<TeamSnapshot>,
}

/// The settings page payload
#[derive(Debug, Serialize)]
pub struct SettingsData {
    pub association: Association,
    pub users: Vec<AssociationUser>,
    pub dashboard_config: Option<DashboardConfig>,
}

/// The reports page payload
#[derive(Debug, Serialize)]
pub struct ReportsData {
    pub season: Vec<SeasonFinancialRow>,
    pub transactions: Vec<TransactionDetailRow>,
    pub alerts: Vec<AlertReportRow>,
}

/// The rules listing payload
#[derive(Debug, Serialize)]
pub struct RulesData {
    pub rules: Vec<AssociationRule>,
}
