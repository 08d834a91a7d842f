use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::config::Backend;
use crate::error::{OrgTreeError, Result};
use crate::types::{Employee, Position};

use super::{ClosureRow, EdgeStore, SELECT_EMPLOYEES, SELECT_POSITIONS};

fn connection_err(e: rusqlite::Error) -> OrgTreeError {
    OrgTreeError::Connection {
        backend: Backend::Sqlite.to_string(),
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> OrgTreeError {
    OrgTreeError::Query(e.to_string())
}

/// SQLite-backed edge store, file or in-memory.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(connection_err)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(connection_err)?;
        Ok(Self { conn })
    }
}

impl EdgeStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn execute(&self, script: &str) -> Result<()> {
        self.conn.execute_batch(script).map_err(query_err)
    }

    fn query_tree(&self, sql: &str) -> Result<Vec<ClosureRow>> {
        let mut stmt = self.conn.prepare(sql).map_err(query_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ClosureRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    position: row.get(2)?,
                    level: row.get(3)?,
                    order_sequence: row.get(4)?,
                })
            })
            .map_err(query_err)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(query_err)
    }

    fn employees(&self) -> Result<Vec<Employee>> {
        let mut stmt = self.conn.prepare(SELECT_EMPLOYEES).map_err(query_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Employee {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    position: row.get(2)?,
                    boss_id: row.get(3)?,
                })
            })
            .map_err(query_err)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(query_err)
    }

    fn positions(&self) -> Result<Vec<Position>> {
        let mut stmt = self.conn.prepare(SELECT_POSITIONS).map_err(query_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Position {
                    id: row.get(0)?,
                    label: row.get(1)?,
                })
            })
            .map_err(query_err)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(query_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;
    use tempfile::TempDir;

    #[test]
    fn seed_into_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        seed::apply(&store).unwrap();
        assert_eq!(store.employees().unwrap().len(), 10);
        assert_eq!(store.positions().unwrap().len(), 3);
    }

    #[test]
    fn seed_twice_leaves_contents_unchanged() {
        let store = SqliteStore::in_memory().unwrap();
        seed::apply(&store).unwrap();
        let before = (store.employees().unwrap(), store.positions().unwrap());
        seed::apply(&store).unwrap();
        let after = (store.employees().unwrap(), store.positions().unwrap());
        assert_eq!(before, after);
    }

    #[test]
    fn file_store_persists_between_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("org.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            seed::apply(&store).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let employees = store.employees().unwrap();
        assert_eq!(employees[0].name, "Дмитрий Иванов");
    }

    #[test]
    fn open_in_missing_directory_is_connection_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/org.db");
        let err = SqliteStore::open(&path).err().unwrap();
        assert!(matches!(err, OrgTreeError::Connection { .. }), "{err}");
    }

    #[test]
    fn bad_sql_is_query_error() {
        let store = SqliteStore::in_memory().unwrap();
        let err = store.query_tree("SELECT * FROM nowhere").unwrap_err();
        assert!(matches!(err, OrgTreeError::Query(_)), "{err}");
    }
}
