//! Snapshot health computation
//!
//! Turns a team's current financial picture plus the association's dashboard
//! thresholds into a health status, a 0-100 score, and a list of red flags.
//! The caller persists the result as a `TeamSnapshot`.

use chrono::{DateTime, Utc};

use crate::models::{DashboardConfig, HealthStatus};

/// A team's current financial picture, assembled from transactions and the
/// team record before taking a snapshot
#[derive(Debug, Clone)]
pub struct TeamFinancials {
    pub budget_total: f64,
    pub spent: f64,
    pub pending_amount: f64,
    pub pending_count: i64,
    pub missing_receipts: i64,
    pub bank_connected: bool,
    pub bank_reconciled_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl TeamFinancials {
    pub fn remaining(&self) -> f64 {
        self.budget_total - self.spent
    }

    /// Percent of budget consumed; 0 when there is no budget to consume
    pub fn percent_used(&self) -> f64 {
        if self.budget_total <= 0.0 {
            0.0
        } else {
            self.spent / self.budget_total * 100.0
        }
    }
}

/// The outcome of a health evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct HealthAssessment {
    pub status: HealthStatus,
    pub score: i32,
    pub red_flags: Vec<String>,
}

/// Evaluates a team's health against the association's thresholds
///
/// Flags come in critical and warning grades. Any critical flag makes the
/// team `at_risk`; any warning flag alone makes it `needs_attention`. The
/// score starts at 100 and each flag family deducts at most once, with the
/// critical grade of a family superseding its warning grade.
///
/// `now` is passed in so callers (and tests) control the clock.
pub fn assess_health(
    financials: &TeamFinancials,
    config: &DashboardConfig,
    now: DateTime<Utc>,
) -> HealthAssessment {
    let mut critical_flags: Vec<String> = Vec::new();
    let mut warning_flags: Vec<String> = Vec::new();
    let mut score: i32 = 100;

    let percent_used = financials.percent_used();
    if percent_used >= config.get_budget_critical_pct() {
        critical_flags.push("BUDGET_CRITICAL".to_string());
        score -= 30;
    } else if percent_used >= config.get_budget_warning_pct() {
        warning_flags.push("BUDGET_WARNING".to_string());
        score -= 15;
    }

    if !financials.bank_connected {
        warning_flags.push("BANK_NOT_CONNECTED".to_string());
        score -= 10;
    } else if let Some(reconciled_at) = financials.bank_reconciled_at {
        let days_since = (now - reconciled_at).num_days();
        if days_since > i64::from(config.get_bank_critical_days()) {
            critical_flags.push("BANK_RECONCILIATION_CRITICAL".to_string());
            score -= 25;
        } else if days_since > i64::from(config.get_bank_warning_days()) {
            warning_flags.push("BANK_RECONCILIATION_WARNING".to_string());
            score -= 12;
        }
    }

    if financials.pending_count >= i64::from(config.get_approvals_critical_count()) {
        critical_flags.push("PENDING_APPROVALS_CRITICAL".to_string());
        score -= 20;
    } else if financials.pending_count >= i64::from(config.get_approvals_warning_count()) {
        warning_flags.push("PENDING_APPROVALS_WARNING".to_string());
        score -= 10;
    }

    if let Some(last_activity) = financials.last_activity_at {
        let idle_days = (now - last_activity).num_days();
        if idle_days > i64::from(config.get_inactivity_warning_days()) {
            warning_flags.push("INACTIVITY_WARNING".to_string());
            score -= 15;
        }
    }

    // Missing receipts deduct 5, or 10 once the backlog passes five
    if financials.missing_receipts > 5 {
        warning_flags.push("MISSING_RECEIPTS".to_string());
        score -= 10;
    } else if financials.missing_receipts > 0 {
        warning_flags.push("MISSING_RECEIPTS".to_string());
        score -= 5;
    }

    let status = if !critical_flags.is_empty() {
        HealthStatus::AtRisk
    } else if !warning_flags.is_empty() {
        HealthStatus::NeedsAttention
    } else {
        HealthStatus::Healthy
    };

    let mut red_flags = critical_flags;
    red_flags.extend(warning_flags);

    HealthAssessment {
        status,
        score: score.max(0),
        red_flags,
    }
}
