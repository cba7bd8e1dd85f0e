pub mod seed;

use std::{
    path::Path,
    time::Instant,
};

use rusqlite::{Connection, ErrorCode, params};
use tracing::{debug, info, warn};

use crate::types::{Priority, Todo, TodoId};

pub use seed::{SCHEMA_VERSION, SEED};

const SELECT_COLUMNS: &str = "SELECT id, name, priority, description, deadline, isCompleted FROM todos";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("todo {0} not found")]
    NotFound(TodoId),
    #[error("todo has not been saved yet")]
    Transient,
    #[error("constraint violation: {0}")]
    ConstraintViolation(#[source] rusqlite::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database schema version {found} is not supported (expected {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

/// Coarse classification of [`StoreError`] used by callers that only care
/// about the failure category.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StoreErrorKind {
    NotFound,
    ConstraintViolation,
    IoFailure,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::NotFound(_) | Self::Transient => StoreErrorKind::NotFound,
            Self::ConstraintViolation(_) => StoreErrorKind::ConstraintViolation,
            Self::Sqlite(_) | Self::Io(_) | Self::UnsupportedSchemaVersion { .. } => {
                StoreErrorKind::IoFailure
            }
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if is_constraint_err(&err) {
            Self::ConstraintViolation(err)
        } else {
            Self::Sqlite(err)
        }
    }
}

/// Storage gateway over the `todos` table.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Seeds `path` if needed and opens it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        let started_at = Instant::now();

        seed::ensure_seeded(path_ref)?;
        let conn = Connection::open(path_ref).inspect_err(|err| {
            warn!(path = %path_ref.display(), error = %err, "failed to open database");
        })?;

        info!(
            path = %path_ref.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "database opened"
        );

        Ok(Self { conn })
    }

    /// Empty store with the seed schema and no rows.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(seed::SCHEMA_SQL)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(Self { conn })
    }


    /// Writes `todo` as a new row and returns it with the assigned id.
    pub fn insert(&self, todo: &Todo) -> Result<Todo, StoreError> {
        self.conn
            .execute(
                "INSERT INTO todos (name, priority, description, deadline, isCompleted) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    todo.name,
                    todo.priority.as_raw(),
                    todo.description,
                    todo.deadline,
                    todo.is_completed
                ],
            )
            .inspect_err(|err| warn!(error = %err, "failed to insert todo"))?;

        let id = TodoId(self.conn.last_insert_rowid());
        debug!(%id, "inserted todo");

        Ok(Todo {
            id: Some(id),
            ..todo.clone()
        })
    }

    /// Overwrites the row matching `todo.id`.
    pub fn update(&self, todo: &Todo) -> Result<(), StoreError> {
        let Some(id) = todo.id else {
            warn!("refusing to update a todo that was never saved");
            return Err(StoreError::Transient);
        };

        let changed = self
            .conn
            .execute(
                "UPDATE todos SET name = ?1, priority = ?2, description = ?3, deadline = ?4, \
                 isCompleted = ?5 WHERE id = ?6",
                params![
                    todo.name,
                    todo.priority.as_raw(),
                    todo.description,
                    todo.deadline,
                    todo.is_completed,
                    id.0
                ],
            )
            .inspect_err(|err| warn!(%id, error = %err, "failed to update todo"))?;

        if changed == 0 {
            warn!(%id, "update matched no todo");
            return Err(StoreError::NotFound(id));
        }

        debug!(%id, "updated todo");
        Ok(())
    }

    pub fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id.0])
            .inspect_err(|err| warn!(%id, error = %err, "failed to delete todo"))?;

        if changed == 0 {
            warn!(%id, "delete matched no todo");
            return Err(StoreError::NotFound(id));
        }

        debug!(%id, "deleted todo");
        Ok(())
    }

    /// Every stored todo in storage order.
    pub fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
        let todos = stmt
            .query_map(params![], map_todo_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .inspect_err(|err| warn!(error = %err, "failed to load todos"))?;

        debug!(count = todos.len(), "loaded todos");
        Ok(todos)
    }

    pub fn get(&self, id: TodoId) -> Result<Todo, StoreError> {
        self.conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.0],
                map_todo_row,
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(id),
                other => other.into(),
            })
    }
}

fn map_todo_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: Some(TodoId(row.get(0)?)),
        name: row.get(1)?,
        priority: Priority::from_raw(row.get(2)?),
        description: row.get(3)?,
        deadline: row.get(4)?,
        is_completed: row.get::<_, i64>(5)? != 0,
    })
}

fn is_constraint_err(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _) if inner.code == ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use rusqlite::Connection;
    use tempfile::TempDir;

    use super::*;

    fn sample(name: &str) -> Todo {
        Todo {
            id: None,
            name: name.to_string(),
            priority: Priority::Medium,
            deadline: 1_767_225_600_000,
            description: format!("{name} description"),
            is_completed: false,
        }
    }

    #[test]
    fn test_insert_assigns_id_and_lists() -> Result<()> {
        let db = Database::open_in_memory()?;

        let saved = db.insert(&sample("Buy milk"))?;
        let todos = db.list_all()?;

        assert!(saved.id.is_some());
        assert_eq!(todos, vec![saved]);
        Ok(())
    }

    #[test]
    fn test_list_all_keeps_insertion_order() -> Result<()> {
        let db = Database::open_in_memory()?;
        let first = db.insert(&sample("first"))?;
        let second = db.insert(&sample("second"))?;

        let ids: Vec<_> = db.list_all()?.into_iter().map(|todo| todo.id).collect();

        assert_eq!(ids, vec![first.id, second.id]);
        Ok(())
    }

    #[test]
    fn test_update_overwrites_row() -> Result<()> {
        let db = Database::open_in_memory()?;
        let mut saved = db.insert(&sample("draft"))?;
        saved.name = "final".to_string();
        saved.priority = Priority::High;
        saved.is_completed = true;

        db.update(&saved)?;

        let id = saved.id.expect("inserted todo has an id");
        assert_eq!(db.get(id)?, saved);
        Ok(())
    }

    #[test]
    fn test_update_and_delete_unknown_id_fail() -> Result<()> {
        let db = Database::open_in_memory()?;
        let kept = db.insert(&sample("kept"))?;
        let ghost = Todo {
            id: Some(TodoId(42)),
            ..sample("ghost")
        };

        let update_err = db.update(&ghost).expect_err("unknown id should not update");
        let delete_err = db.delete(TodoId(42)).expect_err("unknown id should not delete");

        assert_eq!(update_err.kind(), StoreErrorKind::NotFound);
        assert_eq!(delete_err.kind(), StoreErrorKind::NotFound);
        assert_eq!(db.list_all()?, vec![kept]);
        Ok(())
    }

    #[test]
    fn test_update_transient_is_rejected() -> Result<()> {
        let db = Database::open_in_memory()?;

        let err = db.update(&sample("unsaved")).expect_err("transient update");

        assert!(matches!(err, StoreError::Transient));
        assert_eq!(err.kind(), StoreErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_out_of_range_priority_decodes_as_low() -> Result<()> {
        let db = Database::open_in_memory()?;
        db.conn.execute(
            "INSERT INTO todos (name, priority, description, deadline, isCompleted) \
             VALUES ('odd', 7, 'x', 0, 0), ('negative', -1, 'y', 0, 1)",
            [],
        )?;

        let todos = db.list_all()?;

        assert_eq!(todos.len(), 2);
        assert!(todos.iter().all(|todo| todo.priority == Priority::Low));
        assert!(todos[1].is_completed);
        Ok(())
    }

    #[test]
    fn test_constraint_failure_is_classified() -> Result<()> {
        let db = Database::open_in_memory()?;
        let err: StoreError = db
            .conn
            .execute(
                "INSERT INTO todos (name, priority, description, deadline, isCompleted) \
                 VALUES (NULL, 0, 'x', 0, 0)",
                [],
            )
            .map_err(StoreError::from)
            .expect_err("NOT NULL should be enforced");

        assert_eq!(err.kind(), StoreErrorKind::ConstraintViolation);
        Ok(())
    }

    #[test]
    fn test_open_leaves_seed_bytes_intact() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("todo.db");

        let db = Database::open(&path)?;
        let todos = db.list_all()?;
        drop(db);

        assert_eq!(fs::read(&path)?, SEED);
        assert_eq!(todos.len(), 3);
        Ok(())
    }

    #[test]
    fn test_open_uses_default_connection_pragmas() -> Result<()> {
        let dir = TempDir::new()?;
        let db = Database::open(dir.path().join("todo.db"))?;

        let foreign_keys: i64 = db
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;

        assert_eq!(foreign_keys, 0);
        Ok(())
    }

    #[test]
    fn test_open_with_newer_schema_returns_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("todo.db");
        {
            let conn = Connection::open(&path)?;
            conn.execute_batch("PRAGMA user_version = 999;")?;
        }

        let result = Database::open(&path);

        assert!(matches!(
            result,
            Err(StoreError::UnsupportedSchemaVersion { found: 999, .. })
        ));
        Ok(())
    }
}
