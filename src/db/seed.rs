use std::{fs, path::Path};

use rusqlite::{Connection, OpenFlags};
use tracing::{info, warn};

use super::StoreError;

/// Template database shipped with the binary.
pub const SEED: &[u8] = include_bytes!("../../assets/todo.db");

/// `PRAGMA user_version` the gateway understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Schema of the bundled template, used for in-memory stores.
pub(crate) const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    priority INTEGER NOT NULL DEFAULT 0,
    description TEXT NOT NULL,
    deadline INTEGER NOT NULL,
    isCompleted INTEGER NOT NULL DEFAULT 0
);";

/// Makes sure `path` holds a database at [`SCHEMA_VERSION`].
///
/// A missing file is created from [`SEED`]. A file with an older schema is
/// replaced by a fresh copy of the seed, losing its rows. Nothing is written
/// when the file is already current.
pub fn ensure_seeded(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        copy_seed(path)?;
    }

    let version = read_user_version(path)?;
    if version > SCHEMA_VERSION {
        warn!(
            path = %path.display(),
            found = version,
            supported = SCHEMA_VERSION,
            "database was written by a newer release"
        );
        return Err(StoreError::UnsupportedSchemaVersion {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    if version < SCHEMA_VERSION {
        warn!(
            path = %path.display(),
            found = version,
            "outdated database schema, replacing with the bundled template"
        );
        fs::remove_file(path)?;
        copy_seed(path)?;

        let recopied = read_user_version(path)?;
        if recopied != SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchemaVersion {
                found: recopied,
                supported: SCHEMA_VERSION,
            });
        }
    }

    Ok(())
}

/// Reads `PRAGMA user_version` through a read-only connection.
pub fn read_user_version(path: &Path) -> Result<u32, StoreError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(u32::try_from(version).unwrap_or(0))
}

fn copy_seed(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, SEED)?;
    info!(path = %path.display(), bytes = SEED.len(), "copied bundled database template");
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use rusqlite::Connection;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn seed_reports_current_schema_version() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("todo.db");
        fs::write(&path, SEED)?;

        assert_eq!(read_user_version(&path)?, SCHEMA_VERSION);
        Ok(())
    }

    #[test]
    fn missing_file_is_copied_with_parent_dirs() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("data").join("todo.db");

        ensure_seeded(&path)?;

        assert_eq!(fs::read(&path)?, SEED);
        Ok(())
    }

    #[test]
    fn current_file_is_left_untouched() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("todo.db");
        ensure_seeded(&path)?;
        {
            let conn = Connection::open(&path)?;
            conn.execute("DELETE FROM todos", [])?;
        }
        let before = fs::read(&path)?;

        ensure_seeded(&path)?;

        assert_eq!(fs::read(&path)?, before);
        Ok(())
    }

    #[test]
    fn older_schema_is_replaced_by_seed() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("todo.db");
        {
            let conn = Connection::open(&path)?;
            conn.execute_batch("CREATE TABLE legacy (x INTEGER); PRAGMA user_version = 0;")?;
        }

        ensure_seeded(&path)?;

        assert_eq!(fs::read(&path)?, SEED);
        Ok(())
    }

    #[test]
    fn newer_schema_is_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("todo.db");
        {
            let conn = Connection::open(&path)?;
            conn.execute_batch("PRAGMA user_version = 999;")?;
        }

        let err = ensure_seeded(&path).expect_err("newer schema should fail");

        assert!(matches!(
            err,
            StoreError::UnsupportedSchemaVersion {
                found: 999,
                supported: SCHEMA_VERSION
            }
        ));
        Ok(())
    }
}
