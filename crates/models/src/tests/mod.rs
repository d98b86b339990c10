/// CRUD round trips against a live Postgres
pub mod crud_tests;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Connect and migrate when a database is configured; `None` skips the test.
pub(crate) async fn test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip: no DATABASE_URL (or SKIP_DB_TESTS set)");
        return None;
    }
    let db = match crate::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }
    Some(db)
}
