//! # snowflake-conn-mgr
//!
//! Opens a Snowflake connection through a pluggable driver the first time it
//! is needed and keeps reusing it while the driver reports it as up.
//!
//! ## Core Types
//!
//! - **[`ConnectionManager`]**: Owns at most one connection; opens it lazily
//! - **[`ConnectionConfig`]**: Account, credentials and session defaults
//! - **[`Driver`] / [`Connection`]**: The contract a warehouse driver fulfils
//! - **[`Error`]**: Error type for connection setup
//!
//! ## Architecture
//!
//! - **Single connection**: No pooling; one handle per manager
//! - **Lazy connect**: Nothing is opened until the first `acquire()`
//! - **Single-flight**: Concurrent callers share one connect attempt
//! - **Liveness**: A handle that stops reporting `is_up()` is replaced

mod config;
mod driver;
mod error;
mod manager;

// Re-export public types
pub use config::ConnectionConfig;
pub use driver::{Binds, Connection, Driver, DriverError, DriverRowStream, Row};
pub use error::{Error, Result};
pub use manager::{ConnectionManager, ConnectionState};
