//! Configuration for Snowflake driver connections

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Settings handed to the driver every time a connection is opened
///
/// `account`, `username` and `password` are required; the rest are optional
/// session defaults that the driver applies when it connects.
///
/// # Examples
///
/// ```
/// use snowflake_conn_mgr::ConnectionConfig;
///
/// let config = ConnectionConfig::new("ab13241.us-east-2.aws", "loader", "hunter2")
///    .with_warehouse("LOAD_WH")
///    .with_database("RAW");
///
/// assert_eq!(config.warehouse.as_deref(), Some("LOAD_WH"));
/// assert!(config.role.is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
   /// Snowflake account identifier (e.g. `ab13241.us-east-2.aws`)
   pub account: String,

   /// Login name
   pub username: String,

   /// Login password. Never logged and redacted from `Debug` output.
   pub password: String,

   /// Role to use for queries
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub role: Option<String>,

   /// Warehouse to use for queries
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub warehouse: Option<String>,

   /// Database to use for queries
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub database: Option<String>,

   /// Schema to use for queries
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub schema: Option<String>,
}

impl ConnectionConfig {
   /// Create a configuration with only the required settings.
   pub fn new(
      account: impl Into<String>,
      username: impl Into<String>,
      password: impl Into<String>,
   ) -> Self {
      Self {
         account: account.into(),
         username: username.into(),
         password: password.into(),
         role: None,
         warehouse: None,
         database: None,
         schema: None,
      }
   }

   pub fn with_role(mut self, role: impl Into<String>) -> Self {
      self.role = Some(role.into());
      self
   }

   pub fn with_warehouse(mut self, warehouse: impl Into<String>) -> Self {
      self.warehouse = Some(warehouse.into());
      self
   }

   pub fn with_database(mut self, database: impl Into<String>) -> Self {
      self.database = Some(database.into());
      self
   }

   pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
      self.schema = Some(schema.into());
      self
   }

   /// Load the configuration from `SF_*` environment variables.
   ///
   /// | Variable | Field |
   /// |---|---|
   /// | `SF_ACCOUNT` | `account` (required) |
   /// | `SF_USERNAME` | `username` (required) |
   /// | `SF_PASSWORD` | `password` (required) |
   /// | `SF_ROLE` | `role` |
   /// | `SF_WAREHOUSE` | `warehouse` |
   /// | `SF_DATABASE` | `database` |
   /// | `SF_SCHEMA` | `schema` |
   ///
   /// Empty values are treated as unset.
   pub fn from_env() -> Result<Self> {
      Self::from_lookup(|key| std::env::var(key).ok())
   }

   /// Build the configuration from an arbitrary key lookup.
   ///
   /// Used by [`from_env`](Self::from_env); exposed so callers can source the
   /// same `SF_*` keys from somewhere other than the process environment.
   pub fn from_lookup<F>(lookup: F) -> Result<Self>
   where
      F: Fn(&str) -> Option<String>,
   {
      let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
      let required = |key: &'static str| get(key).ok_or(Error::MissingSetting(key));

      let config = Self {
         account: required("SF_ACCOUNT")?,
         username: required("SF_USERNAME")?,
         password: required("SF_PASSWORD")?,
         role: get("SF_ROLE"),
         warehouse: get("SF_WAREHOUSE"),
         database: get("SF_DATABASE"),
         schema: get("SF_SCHEMA"),
      };

      Ok(config)
   }

   /// Check that every required setting is present.
   pub fn validate(&self) -> Result<()> {
      if self.account.trim().is_empty() {
         return Err(Error::MissingSetting("account"));
      }
      if self.username.trim().is_empty() {
         return Err(Error::MissingSetting("username"));
      }
      if self.password.is_empty() {
         return Err(Error::MissingSetting("password"));
      }
      Ok(())
   }
}

impl fmt::Debug for ConnectionConfig {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("ConnectionConfig")
         .field("account", &self.account)
         .field("username", &self.username)
         .field("password", &"<redacted>")
         .field("role", &self.role)
         .field("warehouse", &self.warehouse)
         .field("database", &self.database)
         .field("schema", &self.schema)
         .finish()
   }
}

#[cfg(test)]
mod tests {
   use std::collections::HashMap;

   use super::*;

   fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
      let map: HashMap<String, String> = pairs
         .iter()
         .map(|(k, v)| (k.to_string(), v.to_string()))
         .collect();
      move |key: &str| map.get(key).cloned()
   }

   #[test]
   fn test_from_lookup_reads_all_settings() {
      let config = ConnectionConfig::from_lookup(lookup_from(&[
         ("SF_ACCOUNT", "ab13241.us-east-2.aws"),
         ("SF_USERNAME", "loader"),
         ("SF_PASSWORD", "secret"),
         ("SF_ROLE", "LOADER_ROLE"),
         ("SF_WAREHOUSE", "LOAD_WH"),
         ("SF_DATABASE", "RAW"),
         ("SF_SCHEMA", "PUBLIC"),
      ]))
      .unwrap();

      assert_eq!(config.account, "ab13241.us-east-2.aws");
      assert_eq!(config.username, "loader");
      assert_eq!(config.password, "secret");
      assert_eq!(config.role.as_deref(), Some("LOADER_ROLE"));
      assert_eq!(config.warehouse.as_deref(), Some("LOAD_WH"));
      assert_eq!(config.database.as_deref(), Some("RAW"));
      assert_eq!(config.schema.as_deref(), Some("PUBLIC"));
   }

   #[test]
   fn test_from_lookup_optional_settings_default_to_none() {
      let config = ConnectionConfig::from_lookup(lookup_from(&[
         ("SF_ACCOUNT", "acct"),
         ("SF_USERNAME", "user"),
         ("SF_PASSWORD", "pw"),
         ("SF_ROLE", ""),
      ]))
      .unwrap();

      assert!(config.role.is_none());
      assert!(config.warehouse.is_none());
      assert!(config.database.is_none());
      assert!(config.schema.is_none());
   }

   #[test]
   fn test_from_lookup_missing_required_setting() {
      let err = ConnectionConfig::from_lookup(lookup_from(&[
         ("SF_ACCOUNT", "acct"),
         ("SF_PASSWORD", "pw"),
      ]))
      .unwrap_err();

      assert!(matches!(err, Error::MissingSetting("SF_USERNAME")));
   }

   #[test]
   fn test_validate_rejects_blank_account() {
      let config = ConnectionConfig::new("  ", "user", "pw");
      assert!(matches!(
         config.validate(),
         Err(Error::MissingSetting("account"))
      ));

      assert!(ConnectionConfig::new("acct", "user", "pw").validate().is_ok());
   }

   #[test]
   fn test_debug_redacts_password() {
      let config = ConnectionConfig::new("acct", "user", "hunter2").with_role("ADMIN");
      let printed = format!("{:?}", config);

      assert!(!printed.contains("hunter2"));
      assert!(printed.contains("<redacted>"));
      assert!(printed.contains("ADMIN"));
   }

   #[test]
   fn test_deserialize_with_optional_fields_omitted() {
      let config: ConnectionConfig = serde_json::from_str(
         r#"{"account": "acct", "username": "user", "password": "pw", "warehouse": "WH"}"#,
      )
      .unwrap();

      assert_eq!(config.warehouse.as_deref(), Some("WH"));
      assert!(config.database.is_none());
   }
}
