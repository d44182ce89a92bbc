/// Repository module
///
/// The data access layer: plain functions over the connection pool, one file
/// per aggregate. Handlers never touch Diesel directly; they compose these
/// functions and map their errors onto HTTP responses.

mod alert_repo;
mod association_repo;
mod category_repo;
mod rule_repo;
mod snapshot_repo;
mod team_repo;
mod transaction_repo;
mod user_repo;

pub use alert_repo::*;
pub use association_repo::*;
pub use category_repo::*;
pub use rule_repo::*;
pub use snapshot_repo::*;
pub use team_repo::*;
pub use transaction_repo::*;
pub use user_repo::*;

#[cfg(test)]
mod tests;
