use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, Params, Row};

/// Errors raised inside the storage layer. They are logged at the gateway
/// boundary and collapsed into the failure sentinel; raw `rusqlite` errors
/// never reach business code.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not open database \"{path}\": {source}")]
    Open {
        path: String,
        source: rusqlite::Error,
    },
    #[error("sql statement failed: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// Connection-scoped access to the SQLite file.
///
/// Every public method opens the database, runs exactly one parameterized
/// statement, and releases the connection when it goes out of scope. The
/// connection stays in autocommit mode, so the statement is committed before
/// the drop on every exit path.
pub struct Gateway {
    path: PathBuf,
}

impl Gateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Gateway { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// DDL, UPDATE and DELETE statements. True iff the statement ran without
    /// a storage error; the number of affected rows is not surfaced.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> bool {
        match self.try_execute(sql, params) {
            Ok(changed) => {
                tracing::debug!("statement affected {changed} row(s)");
                true
            }
            Err(e) => {
                tracing::error!("database error: {e}");
                false
            }
        }
    }

    /// Like [`Gateway::execute`], but surfaces the underlying error instead
    /// of the sentinel. Used for schema bootstrap, where a failure must abort
    /// startup with a cause attached.
    pub fn execute_checked<P: Params>(&self, sql: &str, params: P) -> Result<(), StoreError> {
        self.try_execute(sql, params)?;
        Ok(())
    }

    /// INSERT statements. Returns the id assigned to the new row, or `None`
    /// on storage failure.
    pub fn insert<P: Params>(&self, sql: &str, params: P) -> Option<i64> {
        match self.try_insert(sql, params) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!("database error: {e}");
                None
            }
        }
    }

    /// Fetches at most one row. `None` covers both "no matching row" and
    /// "storage failure"; callers must treat it as definitive.
    pub fn query_row<T, P, F>(&self, sql: &str, params: P, map: F) -> Option<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        match self.try_query_row(sql, params, map) {
            Ok(row) => row,
            Err(e) => {
                tracing::error!("database error: {e}");
                None
            }
        }
    }

    /// Fetches all matching rows. `Some(vec)` (possibly empty) on success,
    /// `None` on storage failure.
    pub fn query_rows<T, P, F>(&self, sql: &str, params: P, map: F) -> Option<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        match self.try_query_rows(sql, params, map) {
            Ok(rows) => Some(rows),
            Err(e) => {
                tracing::error!("database error: {e}");
                None
            }
        }
    }

    fn try_execute<P: Params>(&self, sql: &str, params: P) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        Ok(conn.execute(sql, params)?)
    }

    fn try_insert<P: Params>(&self, sql: &str, params: P) -> Result<i64, StoreError> {
        let conn = self.connect()?;
        conn.execute(sql, params)?;
        Ok(conn.last_insert_rowid())
    }

    fn try_query_row<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>, StoreError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        Ok(stmt.query_row(params, map).optional()?)
    }

    fn try_query_rows<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, StoreError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let mapped = stmt.query_map(params, map)?;

        let mut rows = Vec::new();
        for row in mapped {
            rows.push(row?);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_gateway() -> (tempfile::TempDir, Gateway) {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::new(dir.path().join("test.db"));
        gateway
            .execute_checked(
                "CREATE TABLE notes (id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT NOT NULL)",
                [],
            )
            .unwrap();
        (dir, gateway)
    }

    #[test]
    fn test_insert_returns_increasing_ids() {
        let (_dir, gateway) = open_test_gateway();

        let first = gateway
            .insert("INSERT INTO notes (body) VALUES (?1)", ["first"])
            .unwrap();
        let second = gateway
            .insert("INSERT INTO notes (body) VALUES (?1)", ["second"])
            .unwrap();

        assert!(first > 0);
        assert!(second > first);
    }

    #[test]
    fn test_execute_on_malformed_sql_returns_false() {
        let (_dir, gateway) = open_test_gateway();

        assert!(!gateway.execute("DELETE FROM no_such_table", []));
    }

    #[test]
    fn test_insert_failure_returns_none() {
        let (_dir, gateway) = open_test_gateway();

        let id = gateway.insert("INSERT INTO notes (missing) VALUES (?1)", ["x"]);
        assert_eq!(id, None);
    }

    #[test]
    fn test_query_row_without_match_returns_none() {
        let (_dir, gateway) = open_test_gateway();

        let body: Option<String> = gateway.query_row(
            "SELECT body FROM notes WHERE id = ?1",
            [42],
            |row| row.get(0),
        );
        assert_eq!(body, None);
    }

    #[test]
    fn test_query_rows_distinguishes_empty_from_failure() {
        let (_dir, gateway) = open_test_gateway();

        let empty: Option<Vec<String>> =
            gateway.query_rows("SELECT body FROM notes", [], |row| row.get(0));
        assert_eq!(empty, Some(vec![]));

        let failed: Option<Vec<String>> =
            gateway.query_rows("SELECT body FROM no_such_table", [], |row| row.get(0));
        assert_eq!(failed, None);
    }

    #[test]
    fn test_execute_checked_surfaces_the_cause() {
        let (_dir, gateway) = open_test_gateway();

        let result = gateway.execute_checked("CREATE TABLE notes (id INTEGER)", []);
        assert!(matches!(result, Err(StoreError::Sql(_))));
    }
}
