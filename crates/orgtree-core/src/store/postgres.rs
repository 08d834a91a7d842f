//! Postgres-backed edge store.
//!
//! sqlx is async; the store owns a current-thread tokio runtime and blocks
//! on each call so the rest of the pipeline stays synchronous. All SQL is
//! runtime-checked (`sqlx::query_as`, not `query_as!`) so building does not
//! need a live database.

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tokio::runtime::Runtime;

use crate::config::{Backend, StoreConfig};
use crate::error::{OrgTreeError, Result};
use crate::types::{Employee, Position};

use super::{ClosureRow, EdgeStore, SELECT_EMPLOYEES, SELECT_POSITIONS};

fn query_err(e: sqlx::Error) -> OrgTreeError {
    OrgTreeError::Query(e.to_string())
}

pub struct PostgresStore {
    rt: Runtime,
    pool: PgPool,
}

impl PostgresStore {
    /// Open a single connection using the parameters in `cfg`.
    pub fn connect(cfg: &StoreConfig) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let options = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .username(&cfg.user)
            .password(&cfg.password)
            .database(&cfg.database);
        let pool = rt
            .block_on(
                PgPoolOptions::new()
                    .max_connections(1)
                    .connect_with(options),
            )
            .map_err(|e| OrgTreeError::Connection {
                backend: Backend::Postgres.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { rt, pool })
    }
}

impl EdgeStore for PostgresStore {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    fn execute(&self, script: &str) -> Result<()> {
        self.rt
            .block_on(sqlx::raw_sql(script).execute(&self.pool))
            .map_err(query_err)?;
        Ok(())
    }

    fn query_tree(&self, sql: &str) -> Result<Vec<ClosureRow>> {
        let rows = self
            .rt
            .block_on(
                sqlx::query_as::<_, (i64, String, Option<String>, i64, String)>(sql)
                    .fetch_all(&self.pool),
            )
            .map_err(query_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, name, position, level, order_sequence)| ClosureRow {
                id,
                name,
                position,
                level,
                order_sequence,
            })
            .collect())
    }

    fn employees(&self) -> Result<Vec<Employee>> {
        let rows = self
            .rt
            .block_on(
                sqlx::query_as::<_, (i64, String, i64, i64)>(SELECT_EMPLOYEES)
                    .fetch_all(&self.pool),
            )
            .map_err(query_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, name, position, boss_id)| Employee {
                id,
                name,
                position,
                boss_id,
            })
            .collect())
    }

    fn positions(&self) -> Result<Vec<Position>> {
        let rows = self
            .rt
            .block_on(
                sqlx::query_as::<_, (i64, String)>(SELECT_POSITIONS).fetch_all(&self.pool),
            )
            .map_err(query_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, label)| Position { id, label })
            .collect())
    }
}
