//! The driver seam: what this workspace needs from a Snowflake driver
//!
//! The driver owns the real network session, statement execution and result
//! marshaling. Anything that can open a connection, report whether it is
//! still usable, and run SQL with positional binds can be plugged in.

use std::pin::Pin;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tokio_stream::Stream;

use crate::ConnectionConfig;

/// One result row, keyed by column name in result-set order
pub type Row = IndexMap<String, JsonValue>;

/// Error reported by the driver. Kept boxed so the original error survives
/// every layer of wrapping.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Rows produced one at a time by [`Connection::stream_rows`]
pub type DriverRowStream =
   Pin<Box<dyn Stream<Item = std::result::Result<Row, DriverError>> + Send + 'static>>;

/// Values bound to a statement's placeholders
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Binds {
   /// The statement has no placeholders
   #[default]
   None,

   /// One value per placeholder
   Positional(Vec<JsonValue>),

   /// One placeholder tuple bound once per row (array binding). The driver
   /// executes the statement for every inner row.
   Batch(Vec<Vec<JsonValue>>),
}

impl Binds {
   /// True when no values are bound
   pub fn is_empty(&self) -> bool {
      match self {
         Binds::None => true,
         Binds::Positional(values) => values.is_empty(),
         Binds::Batch(rows) => rows.is_empty(),
      }
   }
}

impl From<Vec<JsonValue>> for Binds {
   fn from(values: Vec<JsonValue>) -> Self {
      if values.is_empty() {
         Binds::None
      } else {
         Binds::Positional(values)
      }
   }
}

/// Factory for warehouse connections
#[async_trait]
pub trait Driver: Send + Sync {
   type Connection: Connection;

   /// Open a new session using `config`, resolving once it is ready for use.
   async fn connect(
      &self,
      config: &ConnectionConfig,
   ) -> std::result::Result<Self::Connection, DriverError>;
}

/// An open warehouse session
#[async_trait]
pub trait Connection: Send + Sync + 'static {
   /// Liveness check. A connection that returns `false` is discarded and
   /// replaced on next use.
   fn is_up(&self) -> bool;

   /// Execute `sql` and resolve with every row once execution completes.
   async fn execute(&self, sql: &str, binds: &Binds) -> std::result::Result<Vec<Row>, DriverError>;

   /// Execute `sql` and hand rows back as the driver produces them.
   ///
   /// Execution errors surface as `Err` items on the returned stream.
   fn stream_rows(&self, sql: &str, binds: &Binds) -> DriverRowStream;
}
