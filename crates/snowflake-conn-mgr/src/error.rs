//! Error types for snowflake-conn-mgr

use thiserror::Error;

use crate::driver::DriverError;

/// Errors that may occur while establishing a driver connection
#[derive(Error, Debug)]
pub enum Error {
   /// The driver failed to open a connection. The driver's own error is kept
   /// as the source.
   #[error("failed to connect to account '{account}': {source}")]
   Connect {
      account: String,
      #[source]
      source: DriverError,
   },

   /// The driver returned a connection that does not report itself as up
   #[error("connection to account '{account}' is not live")]
   NotLive { account: String },

   /// A required configuration setting is missing or empty
   #[error("missing required setting: {0}")]
   MissingSetting(&'static str),
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
