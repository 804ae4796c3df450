//! In-memory driver used by the client integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use snowflake_client::{
   Binds, Connection, ConnectionConfig, Driver, DriverError, DriverRowStream, Row,
};

/// Error type the mock reports, so tests can downcast to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockDriverError {
   pub code: String,
   pub message: String,
}

impl std::fmt::Display for MockDriverError {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}: {}", self.code, self.message)
   }
}

impl std::error::Error for MockDriverError {}

#[derive(Default)]
pub struct MockState {
   connects: AtomicUsize,
   up: AtomicBool,
   fail_connect: AtomicBool,
   configs: Mutex<Vec<ConnectionConfig>>,
   executed: Mutex<Vec<(String, Binds)>>,
   rows: Mutex<Vec<Row>>,
   execute_error: Mutex<Option<MockDriverError>>,
}

/// Driver that records what it is asked to do and answers from canned rows.
#[derive(Clone, Default)]
pub struct MockDriver {
   state: Arc<MockState>,
}

impl MockDriver {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn with_rows(rows: Vec<Row>) -> Self {
      let driver = Self::new();
      *driver.state.rows.lock().unwrap() = rows;
      driver
   }

   pub fn connects(&self) -> usize {
      self.state.connects.load(Ordering::SeqCst)
   }

   pub fn executed(&self) -> Vec<(String, Binds)> {
      self.state.executed.lock().unwrap().clone()
   }

   pub fn configs(&self) -> Vec<ConnectionConfig> {
      self.state.configs.lock().unwrap().clone()
   }

   /// Flip the liveness of the current connection
   pub fn set_up(&self, up: bool) {
      self.state.up.store(up, Ordering::SeqCst);
   }

   pub fn fail_connect(&self, fail: bool) {
      self.state.fail_connect.store(fail, Ordering::SeqCst);
   }

   pub fn fail_execute(&self, code: &str, message: &str) {
      *self.state.execute_error.lock().unwrap() = Some(MockDriverError {
         code: code.to_string(),
         message: message.to_string(),
      });
   }
}

#[async_trait]
impl Driver for MockDriver {
   type Connection = MockConnection;

   async fn connect(&self, config: &ConnectionConfig) -> Result<MockConnection, DriverError> {
      self.state.connects.fetch_add(1, Ordering::SeqCst);
      self.state.configs.lock().unwrap().push(config.clone());

      // Give concurrent callers a chance to interleave
      tokio::task::yield_now().await;

      if self.state.fail_connect.load(Ordering::SeqCst) {
         return Err(Box::new(MockDriverError {
            code: "390100".into(),
            message: "Incorrect username or password was specified.".into(),
         }));
      }

      self.state.up.store(true, Ordering::SeqCst);
      Ok(MockConnection {
         state: Arc::clone(&self.state),
      })
   }
}

pub struct MockConnection {
   state: Arc<MockState>,
}

impl MockConnection {
   fn record(&self, sql: &str, binds: &Binds) {
      self
         .state
         .executed
         .lock()
         .unwrap()
         .push((sql.to_string(), binds.clone()));
   }
}

#[async_trait]
impl Connection for MockConnection {
   fn is_up(&self) -> bool {
      self.state.up.load(Ordering::SeqCst)
   }

   async fn execute(&self, sql: &str, binds: &Binds) -> Result<Vec<Row>, DriverError> {
      self.record(sql, binds);

      if let Some(err) = self.state.execute_error.lock().unwrap().clone() {
         return Err(Box::new(err));
      }
      Ok(self.state.rows.lock().unwrap().clone())
   }

   fn stream_rows(&self, sql: &str, binds: &Binds) -> DriverRowStream {
      self.record(sql, binds);

      let mut items: Vec<Result<Row, DriverError>> = self
         .state
         .rows
         .lock()
         .unwrap()
         .iter()
         .cloned()
         .map(Ok)
         .collect();

      // Failures surface after whatever rows were produced
      if let Some(err) = self.state.execute_error.lock().unwrap().clone() {
         items.push(Err(Box::new(err) as DriverError));
      }

      Box::pin(tokio_stream::iter(items))
   }
}

pub fn config() -> ConnectionConfig {
   ConnectionConfig::new("ab13241.us-east-2.aws", "loader", "hunter2")
      .with_role("LOADER")
      .with_warehouse("LOAD_WH")
      .with_database("RAW")
}

pub fn row(pairs: &[(&str, JsonValue)]) -> Row {
   pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.clone()))
      .collect()
}

pub fn init_tracing() {
   let _ = tracing_subscriber::fmt()
      .with_test_writer()
      .with_max_level(tracing::Level::DEBUG)
      .try_init();
}
