/// Data models module
///
/// This module defines the core data structures used throughout the
/// application. It includes database models that map to database tables, the
/// text-backed enums stored in their columns, and methods for creating and
/// manipulating these models.

mod json_value;
pub use json_value::JsonValue;

mod enums;
pub use enums::{HealthStatus, RuleType, Severity, TransactionKind, TransactionStatus, UserRole};

mod association;
pub use association::Association;

mod dashboard_config;
pub use dashboard_config::DashboardConfig;

mod association_user;
pub use association_user::AssociationUser;

mod team;
pub use team::Team;

mod association_team;
pub use association_team::AssociationTeam;

mod snapshot;
pub use snapshot::TeamSnapshot;

mod category;
pub use category::Category;

mod budget_allocation;
pub use budget_allocation::BudgetAllocation;

mod transaction;
pub use transaction::Transaction;

mod alert;
pub use alert::Alert;

mod rule;
pub use rule::AssociationRule;
