use snowflake_conn_mgr::DriverError;

/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
   /// Caller input was rejected before the driver was contacted.
   Validation,
   /// The driver could not establish or confirm a live connection.
   Connection,
   /// The driver reported a failure executing a statement.
   Execution,
}

/// Error types for Snowflake client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// `select()` was given something other than a SELECT statement.
   #[error("expected a SELECT statement")]
   NotASelect,

   /// `insert()` was given no records.
   #[error("insert into '{table}' requires at least one record")]
   EmptyRecords { table: String },

   /// `update()` was given no columns to set.
   #[error("update of '{table}' requires at least one column to set")]
   EmptyUpdates { table: String },

   /// `update()` or `delete()` was given an empty WHERE predicate.
   #[error("a WHERE predicate is required for {operation} on '{table}'")]
   EmptyPredicate {
      operation: &'static str,
      table: String,
   },

   /// Table or column name is not a plain or double-quoted identifier.
   #[error(
      "invalid identifier '{name}': each dot-separated part must match [A-Za-z_][A-Za-z0-9_$]* or be double-quoted"
   )]
   InvalidIdentifier { name: String },

   /// Error from the connection manager.
   #[error(transparent)]
   ConnectionManager(#[from] snowflake_conn_mgr::Error),

   /// The driver failed to execute a statement.
   #[error("statement execution failed: {source}")]
   Execution {
      statement: String,
      #[source]
      source: DriverError,
   },
}

impl Error {
   /// Wrap a driver failure for `statement`.
   pub fn execution(statement: impl Into<String>, source: DriverError) -> Self {
      Error::Execution {
         statement: statement.into(),
         source,
      }
   }

   /// Broad category of this error.
   pub fn kind(&self) -> ErrorKind {
      match self {
         Error::NotASelect
         | Error::EmptyRecords { .. }
         | Error::EmptyUpdates { .. }
         | Error::EmptyPredicate { .. }
         | Error::InvalidIdentifier { .. } => ErrorKind::Validation,
         Error::ConnectionManager(_) => ErrorKind::Connection,
         Error::Execution { .. } => ErrorKind::Execution,
      }
   }

   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::NotASelect => "NOT_A_SELECT".to_string(),
         Error::EmptyRecords { .. } => "EMPTY_RECORDS".to_string(),
         Error::EmptyUpdates { .. } => "EMPTY_UPDATES".to_string(),
         Error::EmptyPredicate { .. } => "EMPTY_PREDICATE".to_string(),
         Error::InvalidIdentifier { .. } => "INVALID_IDENTIFIER".to_string(),
         Error::ConnectionManager(snowflake_conn_mgr::Error::MissingSetting(_)) => {
            "MISSING_SETTING".to_string()
         }
         Error::ConnectionManager(_) => "CONNECTION_ERROR".to_string(),
         Error::Execution { .. } => "EXECUTION_ERROR".to_string(),
      }
   }

   /// The error reported by the driver, if this error came from one.
   pub fn driver_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
      match self {
         Error::Execution { source, .. } => Some(source.as_ref()),
         Error::ConnectionManager(snowflake_conn_mgr::Error::Connect { source, .. }) => {
            Some(source.as_ref())
         }
         _ => None,
      }
   }

   /// The statement text that failed, for execution errors.
   pub fn statement(&self) -> Option<&str> {
      match self {
         Error::Execution { statement, .. } => Some(statement),
         _ => None,
      }
   }
}
