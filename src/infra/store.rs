use crate::domain::{Todo, TodoId};
use rusqlite::{Connection, params};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    title TEXT
)";

#[derive(Debug, Error)]
pub enum TodoStoreError {
    #[error("failed to create data dir {path}: {source}")]
    CreateDir { path: String, source: io::Error },

    #[error("failed to open todo DB at {path}: {source}")]
    OpenDb {
        path: String,
        source: rusqlite::Error,
    },

    #[error("failed to initialize todo DB schema: {0}")]
    Bootstrap(rusqlite::Error),

    #[error("failed to query todo DB: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Owns the single SQLite connection for the lifetime of the app.
#[derive(Debug)]
pub struct TodoStore {
    db_path: PathBuf,
    conn: Connection,
}

impl TodoStore {
    pub fn open_in(data_dir: &Path) -> Result<Self, TodoStoreError> {
        Self::open(super::db_path(data_dir))
    }

    pub fn open(db_path: PathBuf) -> Result<Self, TodoStoreError> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|error| TodoStoreError::CreateDir {
                path: parent.display().to_string(),
                source: error,
            })?;
        }

        let conn = Connection::open(&db_path).map_err(|error| TodoStoreError::OpenDb {
            path: db_path.display().to_string(),
            source: error,
        })?;
        let _ = conn.busy_timeout(Duration::from_millis(250));
        ensure_schema(&conn)?;

        Ok(Self { db_path, conn })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn create(&self, title: &str) -> Result<TodoId, TodoStoreError> {
        self.conn
            .execute("INSERT INTO todos (title) VALUES (?1)", params![title])?;
        Ok(TodoId::new(self.conn.last_insert_rowid()))
    }

    /// Rows come back in the engine's scan order; there is no ORDER BY.
    pub fn list(&self) -> Result<Vec<Todo>, TodoStoreError> {
        let mut stmt = self.conn.prepare("SELECT id, title FROM todos")?;
        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let title: Option<String> = row.get(1)?;
            Ok(Todo::new(TodoId::new(id), title.unwrap_or_default()))
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Returns whether a row was removed. Unknown ids are not an error.
    pub fn delete(&self, id: TodoId) -> Result<bool, TodoStoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id.get()])?;
        Ok(removed > 0)
    }

    pub fn close(self) -> Result<(), TodoStoreError> {
        self.conn
            .close()
            .map_err(|(_conn, error)| TodoStoreError::Query(error))
    }
}

fn ensure_schema(conn: &Connection) -> Result<(), TodoStoreError> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(TodoStoreError::Bootstrap)
}
