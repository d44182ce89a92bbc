use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{JsonValue, RuleType};

/// A governance policy configured by an association
///
/// The rule's behavior is fully described by its type plus a JSON config
/// whose expected shape depends on the type (see `validate_config`).
/// Deleting a rule is a soft delete: it is deactivated, never removed.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::association_rules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssociationRule {
    id: String,
    association_id: String,
    rule_type: RuleType,
    name: String,
    description: Option<String>,
    is_active: bool,
    config: JsonValue,
    created_by: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl AssociationRule {
    pub fn new(
        association_id: &str,
        rule_type: RuleType,
        name: String,
        description: Option<String>,
        config: JsonValue,
        created_by: Option<String>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            association_id: association_id.to_string(),
            rule_type,
            name,
            description,
            is_active: true,
            config,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks that a config value has the shape expected for a rule type
    ///
    /// Amount-cap rules (MAX_BUDGET, MAX_ASSESSMENT, MAX_BUYOUT) require a
    /// positive numeric `maxAmount`. ZERO_BALANCE allows an optional
    /// non-negative `tolerance`. The remaining structured types only require
    /// a JSON object; their shape is free-form configuration.
    pub fn validate_config(rule_type: RuleType, config: &serde_json::Value) -> Result<(), String> {
        let obj = config
            .as_object()
            .ok_or_else(|| "Rule config must be a JSON object".to_string())?;

        match rule_type {
            RuleType::MaxBudget | RuleType::MaxAssessment | RuleType::MaxBuyout => {
                let max = obj
                    .get("maxAmount")
                    .and_then(|v| v.as_f64())
                    .ok_or_else(|| format!("{} rules require a numeric maxAmount", rule_type))?;
                if max <= 0.0 {
                    return Err("maxAmount must be positive".to_string());
                }
                Ok(())
            }
            RuleType::ZeroBalance => {
                if let Some(tolerance) = obj.get("tolerance") {
                    let t = tolerance
                        .as_f64()
                        .ok_or_else(|| "tolerance must be numeric".to_string())?;
                    if t < 0.0 {
                        return Err("tolerance cannot be negative".to_string());
                    }
                }
                Ok(())
            }
            RuleType::ApprovalTiers
            | RuleType::RequiredExpenses
            | RuleType::SigningAuthorityComposition => Ok(()),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_association_id(&self) -> String {
        self.association_id.clone()
    }

    pub fn get_rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn get_description(&self) -> Option<String> {
        self.description.clone()
    }

    pub fn get_is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_config(&self) -> JsonValue {
        self.config.clone()
    }

    pub fn get_created_by(&self) -> Option<String> {
        self.created_by.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_updated_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.updated_at, Utc)
    }
}
