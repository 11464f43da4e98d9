//! MySQL-backed [`Store`] implementation over a sqlx connection pool.

use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlPoolOptions};
use sqlx::{MySql, Transaction};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::GatewayResult;
use crate::store::rows::row_to_json;
use crate::store::{Param, Row, Store, StoreTransaction, WriteSummary};

/// Bind a parameter to a MySQL query.
fn bind_param<'q>(
    query: sqlx::query::Query<'q, MySql, MySqlArguments>,
    param: &'q Param,
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    match param {
        Param::Null => query.bind(None::<String>),
        Param::Bool(v) => query.bind(*v),
        Param::Int(v) => query.bind(*v),
        Param::Float(v) => query.bind(*v),
        Param::String(v) => query.bind(v.as_str()),
    }
}

fn build_query<'q>(
    sql: &'q str,
    params: &'q [Param],
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = bind_param(query, param);
    }
    query
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Connect to the configured attendance database.
    pub async fn connect(config: &Config) -> GatewayResult<Self> {
        let pool = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout_duration())
            .idle_timeout(config.idle_timeout_duration())
            .connect_with(config.connect_options())
            .await?;

        info!(
            host = %config.db_host,
            port = config.db_port,
            database = %config.db_name,
            "Connected to MySQL"
        );

        Ok(Self { pool })
    }

    /// Close the underlying pool. Used on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Store for MySqlStore {
    type Tx = MySqlStoreTx;

    async fn fetch(&self, sql: &str, params: &[Param]) -> GatewayResult<Vec<Row>> {
        let rows = build_query(sql, params).fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), "Fetched result set");
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn execute(&self, sql: &str, params: &[Param]) -> GatewayResult<WriteSummary> {
        let result = build_query(sql, params).execute(&self.pool).await?;
        let last_insert_id = Some(result.last_insert_id()).filter(|id| *id != 0);
        Ok(WriteSummary {
            rows_affected: result.rows_affected(),
            last_insert_id,
        })
    }

    async fn begin(&self) -> GatewayResult<Self::Tx> {
        let tx = self.pool.begin().await?;
        Ok(MySqlStoreTx { tx })
    }
}

pub struct MySqlStoreTx {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl StoreTransaction for MySqlStoreTx {
    async fn fetch(&mut self, sql: &str, params: &[Param]) -> GatewayResult<Vec<Row>> {
        let rows = build_query(sql, params).fetch_all(&mut *self.tx).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn execute(&mut self, sql: &str, params: &[Param]) -> GatewayResult<WriteSummary> {
        let result = build_query(sql, params).execute(&mut *self.tx).await?;
        let last_insert_id = Some(result.last_insert_id()).filter(|id| *id != 0);
        Ok(WriteSummary {
            rows_affected: result.rows_affected(),
            last_insert_id,
        })
    }

    async fn commit(self) -> GatewayResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> GatewayResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
