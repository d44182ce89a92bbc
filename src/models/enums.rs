use diesel::deserialize::{FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize;
use diesel::serialize::{IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::{Sqlite, SqliteValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a text-backed enum stored in a `Text` column.
///
/// Each variant maps to a fixed string, used for the database column,
/// JSON serialization, and `FromStr` parsing alike.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
        #[diesel(sql_type = Text)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("Unknown {}: {}", stringify!($name), other)),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }

        impl FromSql<Text, Sqlite> for $name {
            fn from_sql(value: SqliteValue<'_, '_, '_>) -> diesel::deserialize::Result<Self> {
                let text = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
                text.parse().map_err(|e: String| e.into())
            }
        }

        impl ToSql<Text, Sqlite> for $name {
            fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
                out.set_value(self.as_str().to_string());
                Ok(IsNull::No)
            }
        }
    };
}

text_enum! {
    /// Review lifecycle of a transaction. New transactions start PENDING and
    /// may move to APPROVED or REJECTED exactly once.
    TransactionStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

impl TransactionStatus {
    /// Whether a review transition from `self` to `target` is allowed.
    pub fn can_transition_to(&self, target: TransactionStatus) -> bool {
        matches!(
            (self, target),
            (TransactionStatus::Pending, TransactionStatus::Approved)
                | (TransactionStatus::Pending, TransactionStatus::Rejected)
        )
    }
}

text_enum! {
    TransactionKind {
        Expense => "EXPENSE",
        Income => "INCOME",
    }
}

text_enum! {
    Severity {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
}

text_enum! {
    /// Overall team financial health, computed from snapshot red flags.
    HealthStatus {
        Healthy => "healthy",
        NeedsAttention => "needs_attention",
        AtRisk => "at_risk",
    }
}

text_enum! {
    RuleType {
        MaxBudget => "MAX_BUDGET",
        MaxAssessment => "MAX_ASSESSMENT",
        MaxBuyout => "MAX_BUYOUT",
        ZeroBalance => "ZERO_BALANCE",
        ApprovalTiers => "APPROVAL_TIERS",
        RequiredExpenses => "REQUIRED_EXPENSES",
        SigningAuthorityComposition => "SIGNING_AUTHORITY_COMPOSITION",
    }
}

text_enum! {
    UserRole {
        AssociationAdmin => "association_admin",
        BoardMember => "board_member",
        Auditor => "auditor",
        Treasurer => "treasurer",
        Viewer => "viewer",
    }
}
