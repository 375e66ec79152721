use std::fs;
use std::path::Path;
use std::sync::Arc;

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel::{prelude::*, sql_query};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::errors::DatabaseError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Creates the database file if missing and brings the schema up to date.
pub fn init(db_path: &str) -> Result<(), DatabaseError> {
    if !Path::new(db_path).exists() {
        create_db_file(db_path)?;
    }

    run_migrations(db_path)
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>, DatabaseError> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder().build(manager)?;
    Ok(Arc::new(pool))
}

pub fn establish_connection(db_path: &str) -> Result<SqliteConnection, DatabaseError> {
    let mut conn = SqliteConnection::establish(db_path)?;

    // Enable foreign key constraint enforcement
    sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;

    Ok(conn)
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection, DatabaseError> {
    pool.get().map_err(DatabaseError::PoolCreationFailed)
}

fn run_migrations(db_path: &str) -> Result<(), DatabaseError> {
    let mut connection = establish_connection(db_path)?;
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    Ok(())
}

fn create_db_file(db_path: &str) -> Result<(), DatabaseError> {
    let db_dir = Path::new(db_path).parent();

    if let Some(dir) = db_dir {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        }
    }

    fs::File::create(db_path).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    Ok(())
}
