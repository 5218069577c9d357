//! Schema migrator for the single `millionaires` table.
//!
//! Both directions are idempotent: `up` checks `information_schema` first
//! and skips creation when the table is present, `down` uses
//! `DROP TABLE IF EXISTS`.

use std::fmt;
use std::str::FromStr;

use crate::DbPool;

/// Name of the only table this service owns.
pub const TABLE_NAME: &str = "millionaires";

const TABLE_EXISTS_SQL: &str = "\
    SELECT EXISTS ( \
        SELECT 1 FROM information_schema.tables \
        WHERE table_schema = current_schema() AND table_name = $1 \
    )";

const CREATE_TABLE_SQL: &str = "\
    CREATE TABLE millionaires ( \
        id BIGSERIAL PRIMARY KEY, \
        last_name VARCHAR(500) NOT NULL, \
        first_name VARCHAR(500) NOT NULL, \
        middle_name VARCHAR(500), \
        birth_date DATE, \
        birth_place TEXT, \
        company TEXT, \
        net_worth DOUBLE PRECISION, \
        industry TEXT, \
        country TEXT, \
        biography TEXT, \
        path_to_photo TEXT, \
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW() \
    )";

const CREATE_NET_WORTH_INDEX_SQL: &str = "\
    CREATE INDEX idx_millionaires_net_worth \
    ON millionaires (net_worth DESC NULLS LAST, id ASC)";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS millionaires";

/// Which way to run the migrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationDirection {
    Up,
    Down,
}

impl FromStr for MigrationDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(format!(
                "Invalid migration direction '{other}'. Use 'up' or 'down'."
            )),
        }
    }
}

impl fmt::Display for MigrationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Whether the table exists in the current schema.
pub async fn table_exists(pool: &DbPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(TABLE_EXISTS_SQL)
        .bind(TABLE_NAME)
        .fetch_one(pool)
        .await
}

/// Create the table and its index unless the table already exists.
///
/// Returns `true` if the schema was created by this call.
pub async fn migrate_up(pool: &DbPool) -> Result<bool, sqlx::Error> {
    if table_exists(pool).await? {
        tracing::info!(table = TABLE_NAME, "Table already exists, skipping creation");
        return Ok(false);
    }

    let mut tx = pool.begin().await?;
    sqlx::query(CREATE_TABLE_SQL).execute(&mut *tx).await?;
    sqlx::query(CREATE_NET_WORTH_INDEX_SQL)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(table = TABLE_NAME, "Table created");
    Ok(true)
}

/// Drop the table if present.
pub async fn migrate_down(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(DROP_TABLE_SQL).execute(pool).await?;
    tracing::info!(table = TABLE_NAME, "Table dropped");
    Ok(())
}

/// Run the migrator in the given direction.
pub async fn run(pool: &DbPool, direction: MigrationDirection) -> Result<(), sqlx::Error> {
    match direction {
        MigrationDirection::Up => migrate_up(pool).await.map(|_| ()),
        MigrationDirection::Down => migrate_down(pool).await,
    }
}
