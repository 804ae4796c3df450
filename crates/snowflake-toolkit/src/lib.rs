//! # snowflake-toolkit
//!
//! Building blocks shared by the Snowflake convenience client: statement
//! builders, identifier checks, the streamed-row type and the error type
//! every operation returns.
//!
//! ## Trust boundary
//!
//! Table names and record keys are validated before they are interpolated.
//! WHERE predicates passed to [`build_update`] and [`build_delete`] are
//! appended verbatim and must come from trusted code; put untrusted values in
//! binds instead.

mod error;
pub mod identifier;
pub mod statement;
mod stream;

pub use error::{Error, ErrorKind, Result};
pub use identifier::{quote_identifier, validate_identifier};
pub use statement::{
   Record, Statement, build_delete, build_insert, build_update, ensure_select, unique_columns,
};
pub use stream::RowStream;
