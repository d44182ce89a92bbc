/// Handlers module
///
/// Axum handlers grouped by resource. Each handler validates the tenant
/// first, delegates to the repository layer (and the alerts/health/reports
/// modules), and maps errors onto `ApiError`.

pub mod alert_handlers;
pub mod association_handlers;
pub mod report_handlers;
pub mod rule_handlers;
pub mod team_handlers;
pub mod transaction_handlers;

pub use alert_handlers::*;
pub use association_handlers::*;
pub use report_handlers::*;
pub use rule_handlers::*;
pub use team_handlers::*;
pub use transaction_handlers::*;
