use std::future::{Future, IntoFuture};
use std::pin::Pin;

use serde_json::Value as JsonValue;
use snowflake_conn_mgr::{
   Binds, Connection, ConnectionConfig, ConnectionManager, ConnectionState, Driver,
};
use snowflake_toolkit::{
   Error, Record, Result, RowStream, Statement, build_delete, build_insert, build_update,
   ensure_select,
};
use tracing::{error, info};

/// Snowflake client exposing select/insert/update/delete helpers.
///
/// Holds the configuration and at most one driver connection, opened on the
/// first operation and reused while the driver reports it as up. Operations
/// build SQL text and hand it to the driver; they never retry and never
/// swallow errors.
///
/// # Trust boundary
///
/// `where` predicates given to [`update`](Self::update) and
/// [`delete`](Self::delete) are inserted into the statement verbatim. Never
/// build them from untrusted input. Table names and record keys are checked
/// as identifiers; see [`quote_identifier`](crate::quote_identifier) for
/// case-sensitive names.
pub struct SnowflakeClient<D: Driver> {
   manager: ConnectionManager<D>,
}

impl<D: Driver> SnowflakeClient<D> {
   /// Create a client. No connection is opened until the first operation.
   pub fn new(driver: D, config: ConnectionConfig) -> Self {
      Self {
         manager: ConnectionManager::new(driver, config),
      }
   }

   /// Configuration used to open connections
   pub fn config(&self) -> &ConnectionConfig {
      self.manager.config()
   }

   /// Lifecycle state of the underlying connection
   pub fn state(&self) -> ConnectionState {
      self.manager.state()
   }

   /// The underlying driver
   pub fn driver(&self) -> &D {
      self.manager.driver()
   }

   /// Start a SELECT.
   ///
   /// Await the returned builder for every row at once, or call
   /// [`SelectBuilder::stream`] to pull rows as the driver produces them.
   /// Statements that do not begin with `SELECT` fail with
   /// [`Error::NotASelect`] before any connection is made.
   ///
   /// ```ignore
   /// let rows = client.select("SELECT * FROM loans WHERE id = ?").bind(101).await?;
   ///
   /// let mut stream = client.select("SELECT * FROM loans").stream().await?;
   /// while let Some(row) = stream.next().await {
   ///    println!("{:?}", row?);
   /// }
   /// ```
   pub fn select(&self, statement: impl Into<String>) -> SelectBuilder<'_, D> {
      SelectBuilder {
         client: self,
         statement: statement.into(),
         values: Vec::new(),
      }
   }

   /// Insert `records` into `table` with a single batch-bound INSERT.
   ///
   /// The column list is every key seen across `records`, in first-seen
   /// order; a record missing a column inserts `NULL` for it. An empty
   /// `records` slice is rejected with [`Error::EmptyRecords`].
   pub async fn insert(&self, table: &str, records: &[Record]) -> Result<()> {
      let result = async {
         let statement = build_insert(table, records)?;
         self.run(statement).await
      }
      .await;

      log_outcome("Insert", result).map(drop)
   }

   /// Set the columns of `updates` on rows of `table` matching `where_clause`.
   ///
   /// Values are bound positionally in the mapping's key order.
   /// `where_clause` is appended verbatim (see the trust boundary above).
   pub async fn update(&self, table: &str, updates: &Record, where_clause: &str) -> Result<()> {
      let result = async {
         let statement = build_update(table, updates, where_clause)?;
         self.run(statement).await
      }
      .await;

      log_outcome("Update", result).map(drop)
   }

   /// Delete rows of `table` matching `where_clause`, appended verbatim.
   pub async fn delete(&self, table: &str, where_clause: &str) -> Result<()> {
      let result = async {
         let statement = build_delete(table, where_clause)?;
         self.run(statement).await
      }
      .await;

      log_outcome("Delete", result).map(drop)
   }

   /// Execute a statement on a live connection and collect its rows
   async fn run(&self, statement: Statement) -> Result<Vec<Record>> {
      let conn = self.manager.acquire().await?;

      info!(statement = %statement.sql, "Executing statement");
      conn
         .execute(&statement.sql, &statement.binds)
         .await
         .map_err(|source| Error::execution(statement.sql, source))
   }

   /// Start a streamed execution on a live connection
   async fn run_streaming(&self, statement: Statement) -> Result<RowStream> {
      let conn = self.manager.acquire().await?;

      info!(statement = %statement.sql, "Executing statement");
      let rows = conn.stream_rows(&statement.sql, &statement.binds);
      Ok(RowStream::new(statement.sql, rows))
   }
}

/// Builder for SELECT queries
///
/// Awaiting the builder runs the query and returns every row;
/// [`stream`](Self::stream) returns a [`RowStream`] instead.
#[must_use = "a select does nothing until it is awaited or streamed"]
pub struct SelectBuilder<'a, D: Driver> {
   client: &'a SnowflakeClient<D>,
   statement: String,
   values: Vec<JsonValue>,
}

impl<'a, D: Driver> SelectBuilder<'a, D> {
   /// Bind the next positional placeholder
   pub fn bind(mut self, value: impl Into<JsonValue>) -> Self {
      self.values.push(value.into());
      self
   }

   /// Bind several positional placeholders in order
   pub fn binds(mut self, values: impl IntoIterator<Item = JsonValue>) -> Self {
      self.values.extend(values);
      self
   }

   /// Run the query and return all rows once execution completes
   pub async fn execute(self) -> Result<Vec<Record>> {
      let SelectBuilder {
         client,
         statement,
         values,
      } = self;

      let result = async move {
         ensure_select(&statement)?;
         client
            .run(Statement::new(statement, Binds::from(values)))
            .await
      }
      .await;

      let rows = log_outcome("Select", result)?;
      info!(rows = rows.len(), "Select returned rows");
      Ok(rows)
   }

   /// Run the query and return its rows as a lazy, single-pass stream.
   ///
   /// Validation and connection errors are returned here; errors the driver
   /// reports while producing rows arrive as items on the stream.
   pub async fn stream(self) -> Result<RowStream> {
      let SelectBuilder {
         client,
         statement,
         values,
      } = self;

      let result = async move {
         ensure_select(&statement)?;
         client
            .run_streaming(Statement::new(statement, Binds::from(values)))
            .await
      }
      .await;

      log_outcome("Streamed select", result)
   }
}

impl<'a, D: Driver + 'a> IntoFuture for SelectBuilder<'a, D> {
   type Output = Result<Vec<Record>>;
   type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send + 'a>>;

   fn into_future(self) -> Self::IntoFuture {
      Box::pin(self.execute())
   }
}

/// Log how an operation ended and hand the result back unchanged
fn log_outcome<T>(operation: &'static str, result: Result<T>) -> Result<T> {
   match &result {
      Ok(_) => info!("{operation} statement successful"),
      Err(e) => error!(
         operation,
         code = %e.error_code(),
         error = %e,
         "{operation} statement failed"
      ),
   }
   result
}
