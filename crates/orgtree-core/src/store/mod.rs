//! Edge store: the relational collaborator holding `employees` and
//! `positions`.
//!
//! A store can run a batch script (schema + seed), answer the recursive
//! tree query, and list both raw relations. Backends report connection failures as
//! [`OrgTreeError::Connection`] and everything after that as
//! [`OrgTreeError::Query`].
//!
//! [`OrgTreeError::Connection`]: crate::error::OrgTreeError::Connection
//! [`OrgTreeError::Query`]: crate::error::OrgTreeError::Query

pub mod postgres;
pub mod seed;
pub mod sqlite;

use crate::config::{Backend, StoreConfig};
use crate::error::Result;
use crate::types::{Employee, Position};

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

pub(crate) const SELECT_EMPLOYEES: &str = "SELECT CAST(id AS BIGINT), name, \
     CAST(position AS BIGINT), CAST(bossid AS BIGINT) FROM employees ORDER BY id";

pub(crate) const SELECT_POSITIONS: &str =
    "SELECT CAST(id AS BIGINT), position FROM positions ORDER BY id";

/// One row of the recursive closure before it becomes a
/// [`TreeRow`](crate::types::TreeRow). `position` is `None` when the
/// employee's position id names no position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureRow {
    pub id: i64,
    pub name: String,
    pub position: Option<String>,
    pub level: i64,
    pub order_sequence: String,
}

pub trait EdgeStore {
    fn backend(&self) -> Backend;

    /// Run a multi-statement script (DDL and DML) with autocommit semantics.
    fn execute(&self, script: &str) -> Result<()>;

    /// Run a read query whose columns are
    /// `(id, name, position label or NULL, level, order sequence)`.
    fn query_tree(&self, sql: &str) -> Result<Vec<ClosureRow>>;

    fn employees(&self) -> Result<Vec<Employee>>;

    fn positions(&self) -> Result<Vec<Position>>;
}

/// Connect to the backend named in `cfg`.
pub fn open(cfg: &StoreConfig) -> Result<Box<dyn EdgeStore>> {
    let store: Box<dyn EdgeStore> = match cfg.backend {
        Backend::Sqlite => Box::new(SqliteStore::open(&cfg.path)?),
        Backend::Postgres => Box::new(PostgresStore::connect(cfg)?),
    };
    tracing::info!(store = %cfg.describe(), "connected to edge store");
    Ok(store)
}
