//! Table definitions and the migration runner.
//!
//! Every table is SCHEMAFULL. Record keys are v7 UUID strings, so
//! ordering by `id` is ordering by creation time. Enum columns are
//! plain strings guarded by ASSERT clauses.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};

use crate::error::DbError;

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "secrets_and_authorities",
        sql: SECRETS_AND_AUTHORITIES,
    },
    Migration {
        version: 2,
        name: "operation_audit",
        sql: OPERATION_AUDIT,
    },
];

const SECRETS_AND_AUTHORITIES: &str = "\
-- Versioned named secrets. A write always inserts a new row.
DEFINE TABLE secret SCHEMAFULL;
DEFINE FIELD name ON TABLE secret TYPE string;
DEFINE FIELD secret_type ON TABLE secret TYPE string \
    ASSERT $value IN ['value', 'password', 'certificate'];
DEFINE FIELD content ON TABLE secret TYPE option<string>;
DEFINE FIELD ca ON TABLE secret TYPE option<string>;
DEFINE FIELD certificate ON TABLE secret TYPE option<string>;
DEFINE FIELD private_key ON TABLE secret TYPE option<string>;
DEFINE FIELD created_at ON TABLE secret TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_secret_name ON TABLE secret COLUMNS name;

-- Versioned certificate authorities, resolved by most recent version.
DEFINE TABLE certificate_authority SCHEMAFULL;
DEFINE FIELD name ON TABLE certificate_authority TYPE string;
DEFINE FIELD ca_type ON TABLE certificate_authority TYPE string \
    ASSERT $value IN ['root'];
DEFINE FIELD certificate ON TABLE certificate_authority TYPE string;
DEFINE FIELD private_key ON TABLE certificate_authority TYPE string;
DEFINE FIELD created_at ON TABLE certificate_authority TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_certificate_authority_name ON TABLE certificate_authority \
    COLUMNS name;
";

const OPERATION_AUDIT: &str = "\
-- One row per handled request. Scoped sessions may only create and read.
DEFINE TABLE operation_audit_record SCHEMAFULL \
    PERMISSIONS FOR select, create FULL, FOR update, delete NONE;
DEFINE FIELD path ON TABLE operation_audit_record TYPE string;
DEFINE FIELD operation ON TABLE operation_audit_record TYPE string \
    ASSERT $value IN ['credential_update', 'credential_delete', \
    'credential_access', 'ca_update', 'ca_access'];
DEFINE FIELD outcome ON TABLE operation_audit_record TYPE string \
    ASSERT $value IN ['Success', 'Failure'];
DEFINE FIELD failure_code ON TABLE operation_audit_record \
    TYPE option<string>;
DEFINE FIELD actor ON TABLE operation_audit_record TYPE option<string>;
DEFINE FIELD timestamp ON TABLE operation_audit_record TYPE datetime;
DEFINE INDEX idx_operation_audit_path ON TABLE operation_audit_record \
    COLUMNS path;
";

/// Bring the connected database up to the latest schema version.
///
/// Versions already recorded in `_migration` are skipped, so calling
/// this on every start-up is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let applied: Vec<AppliedMigration> = result.take(0)?;
    let current = applied.first().map(|m| m.version).unwrap_or(0);
    debug!(current, latest = latest_version(), "Checked schema version");

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );

        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}' failed: {e}",
                migration.version, migration.name
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "could not record v{}: {e}",
                    migration.version
                ))
            })?;
    }

    Ok(())
}

/// Highest schema version this build knows about.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}
