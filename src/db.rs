use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Enables foreign key enforcement on every pooled connection
///
/// SQLite ships with foreign keys off and the setting is per-connection,
/// so it has to be applied each time the pool hands one out.
#[derive(Debug)]
struct ForeignKeyEnforcer;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ForeignKeyEnforcer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn init_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(ForeignKeyEnforcer))
        .build(manager)
        .expect("Failed to create pool.")
}
