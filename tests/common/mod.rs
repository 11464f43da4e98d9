//! Scripted fake store for driving the dispatcher in tests.
//!
//! Each test enqueues the results its statements should produce, runs the
//! tool calls, then asserts on the recorded statement log. Transaction
//! boundaries appear in the log as BEGIN/COMMIT/ROLLBACK markers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use attendance_mcp_server::error::{GatewayError, GatewayResult};
use attendance_mcp_server::store::{Param, Row, Store, StoreTransaction, WriteSummary};

/// One scripted outcome for the next issued statement.
pub enum Step {
    Rows(Vec<Row>),
    Write(WriteSummary),
    Fail(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub sql: String,
    pub params: Vec<Param>,
}

#[derive(Default)]
struct Inner {
    script: Mutex<VecDeque<Step>>,
    log: Mutex<Vec<LogEntry>>,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Inner>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        self.push(Step::Rows(rows));
        self
    }

    pub fn with_write(self, rows_affected: u64, last_insert_id: Option<u64>) -> Self {
        self.push(Step::Write(WriteSummary {
            rows_affected,
            last_insert_id,
        }));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.push(Step::Fail(message.to_string()));
        self
    }

    fn push(&self, step: Step) {
        self.inner.script.lock().unwrap().push_back(step);
    }

    fn record(&self, sql: &str, params: &[Param]) {
        self.inner.log.lock().unwrap().push(LogEntry {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }

    fn next_step(&self, sql: &str) -> Step {
        self.inner
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted statement: {}", sql))
    }

    fn fetch_impl(&self, sql: &str, params: &[Param]) -> GatewayResult<Vec<Row>> {
        self.record(sql, params);
        match self.next_step(sql) {
            Step::Rows(rows) => Ok(rows),
            Step::Write(_) => panic!("scripted a write result for a fetch: {}", sql),
            Step::Fail(message) => Err(GatewayError::store(message)),
        }
    }

    fn execute_impl(&self, sql: &str, params: &[Param]) -> GatewayResult<WriteSummary> {
        self.record(sql, params);
        match self.next_step(sql) {
            Step::Write(summary) => Ok(summary),
            Step::Rows(_) => panic!("scripted a row result for an execute: {}", sql),
            Step::Fail(message) => Err(GatewayError::store(message)),
        }
    }

    /// All issued statements in order, including transaction markers.
    pub fn statements(&self) -> Vec<String> {
        self.inner
            .log
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.sql.clone())
            .collect()
    }

    /// Bind parameters of the statement at `index` in the log.
    pub fn params_at(&self, index: usize) -> Vec<Param> {
        self.inner.log.lock().unwrap()[index].params.clone()
    }
}

#[async_trait]
impl Store for FakeStore {
    type Tx = FakeTx;

    async fn fetch(&self, sql: &str, params: &[Param]) -> GatewayResult<Vec<Row>> {
        self.fetch_impl(sql, params)
    }

    async fn execute(&self, sql: &str, params: &[Param]) -> GatewayResult<WriteSummary> {
        self.execute_impl(sql, params)
    }

    async fn begin(&self) -> GatewayResult<Self::Tx> {
        self.record("BEGIN", &[]);
        Ok(FakeTx {
            store: self.clone(),
        })
    }
}

pub struct FakeTx {
    store: FakeStore,
}

#[async_trait]
impl StoreTransaction for FakeTx {
    async fn fetch(&mut self, sql: &str, params: &[Param]) -> GatewayResult<Vec<Row>> {
        self.store.fetch_impl(sql, params)
    }

    async fn execute(&mut self, sql: &str, params: &[Param]) -> GatewayResult<WriteSummary> {
        self.store.execute_impl(sql, params)
    }

    async fn commit(self) -> GatewayResult<()> {
        self.store.record("COMMIT", &[]);
        Ok(())
    }

    async fn rollback(self) -> GatewayResult<()> {
        self.store.record("ROLLBACK", &[]);
        Ok(())
    }
}

/// Build a row from (column, value) pairs.
pub fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
