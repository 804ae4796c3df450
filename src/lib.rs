//! # snowflake-client
//!
//! A small async client over a Snowflake driver with `select`, `insert`,
//! `update` and `delete` helpers. The client opens one connection on first
//! use, builds SQL text, and hands it to the driver.
//!
//! # Example
//!
//! ```ignore
//! use indexmap::IndexMap;
//! use serde_json::json;
//! use snowflake_client::{ConnectionConfig, Record, SnowflakeClient};
//!
//! // `driver` is any type implementing `snowflake_client::Driver`
//! let client = SnowflakeClient::new(driver, ConnectionConfig::from_env()?);
//!
//! let rows = client.select("select * from dbt_rob_brichler.temp").await?;
//!
//! let records: Vec<Record> = vec![
//!    IndexMap::from([("loan_id".into(), json!("101")), ("first_name".into(), json!("test1"))]),
//!    IndexMap::from([("loan_id".into(), json!("102"))]),
//! ];
//! client.insert("dbt_rob_brichler.temp", &records).await?;
//!
//! let updates = IndexMap::from([("first_name".into(), json!("updated"))]);
//! client.update("dbt_rob_brichler.temp", &updates, "loan_id = 101").await?;
//!
//! client.delete("dbt_rob_brichler.temp", "first_name = 'updated'").await?;
//! ```

mod client;

pub use client::{SelectBuilder, SnowflakeClient};
pub use snowflake_conn_mgr::{
   Binds, Connection, ConnectionConfig, ConnectionState, Driver, DriverError, DriverRowStream, Row,
};
pub use snowflake_toolkit::{
   Error, ErrorKind, Record, Result, RowStream, Statement, quote_identifier,
};
