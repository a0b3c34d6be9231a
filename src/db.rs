//! One synchronous Postgres connection, held for a whole run.

use crate::config::DbConfig;
use crate::error::ImportResult;
use crate::schema;
use postgres::{Client, NoTls};

pub struct Database {
    client: Client,
}

impl Database {
    pub fn connect(cfg: &DbConfig) -> ImportResult<Self> {
        tracing::debug!(
            "connecting to postgres host={} port={} db={} user={}",
            cfg.host,
            cfg.port,
            cfg.dbname,
            cfg.effective_user()
        );
        let client = cfg.to_pg_config().connect(NoTls)?;
        tracing::info!("connected to {}:{}/{}", cfg.host, cfg.port, cfg.dbname);
        Ok(Self { client })
    }

    /// Orderly teardown. Dropping a `Database` also releases the connection.
    pub fn close(self) -> ImportResult<()> {
        self.client.close()?;
        tracing::debug!("postgres connection closed");
        Ok(())
    }

    pub fn client(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Run one or more `;`-separated statements without parameters.
    pub fn batch(&mut self, sql: &str) -> ImportResult<()> {
        self.client.batch_execute(sql)?;
        Ok(())
    }

    /// Run a single parameterless statement and return the affected row count.
    pub fn execute(&mut self, sql: &str) -> ImportResult<u64> {
        Ok(self.client.execute(sql, &[])?)
    }

    pub fn staging_exists(&mut self) -> ImportResult<bool> {
        let row = self.client.query_one(schema::STAGING_EXISTS, &[])?;
        Ok(row.get(0))
    }
}
