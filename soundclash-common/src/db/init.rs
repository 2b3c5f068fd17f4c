//! Database initialization
//!
//! Opens (creating if needed) the SQLite database and brings up the schema.
//! Schema creation is idempotent and safe to run on every startup.

use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::Result;

/// Initialize the database connection pool and create tables if needed.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL: readers see a consistent snapshot while one writer commits
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_battles_table(&pool).await?;
    create_votes_table(&pool).await?;

    Ok(pool)
}

/// Create the battles table
///
/// One row per battle: key = battle name, value = serialized Battle record.
async fn create_battles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS battles (
            name TEXT PRIMARY KEY,
            data TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the votes table
///
/// One row per (battle, voter) pair: the battle_name column is the
/// per-battle vote namespace, the value a serialized ballot.
async fn create_votes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            battle_name TEXT NOT NULL,
            voter_id TEXT NOT NULL,
            data TEXT NOT NULL,
            PRIMARY KEY (battle_name, voter_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_battle ON votes(battle_name)")
        .execute(pool)
        .await?;

    Ok(())
}
