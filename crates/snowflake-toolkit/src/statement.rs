//! Statement builders for the client's select/insert/update/delete helpers
//!
//! Builders only produce SQL text plus binds; nothing here talks to a
//! driver. Table names and record keys are checked with
//! [`validate_identifier`](crate::identifier::validate_identifier). WHERE
//! predicates are caller-supplied SQL and are appended verbatim.

use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde_json::Value as JsonValue;
use snowflake_conn_mgr::Binds;

use crate::Error;
use crate::identifier::validate_identifier;

/// A column → value mapping used as insert/update input and select output.
pub type Record = IndexMap<String, JsonValue>;

/// SQL text and the values bound to its placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
   pub sql: String,
   pub binds: Binds,
}

impl Statement {
   pub fn new(sql: impl Into<String>, binds: Binds) -> Self {
      Self {
         sql: sql.into(),
         binds,
      }
   }
}

static SELECT_KEYWORD: LazyLock<Regex> =
   LazyLock::new(|| Regex::new(r"(?i)^\s*select\b").expect("valid SELECT pattern"));

/// Accept only statements that begin with the SELECT keyword.
///
/// The check is case-insensitive and ignores leading whitespace. It is not
/// a parser: `WITH ... SELECT` and other read-only forms are rejected.
pub fn ensure_select(statement: &str) -> Result<(), Error> {
   if SELECT_KEYWORD.is_match(statement) {
      Ok(())
   } else {
      Err(Error::NotASelect)
   }
}

/// Distinct keys across `records`, in the order they are first seen.
pub fn unique_columns(records: &[Record]) -> IndexSet<&str> {
   records
      .iter()
      .flat_map(|record| record.keys().map(String::as_str))
      .collect()
}

/// Build a batch INSERT for `records`.
///
/// The column list is the union of keys across every record. One placeholder
/// tuple is emitted and the records are bound as rows of a
/// [`Binds::Batch`]; a record missing a column binds `null` for it. Values
/// that are present are bound as given, including `0`, `""` and `false`.
pub fn build_insert(table: &str, records: &[Record]) -> Result<Statement, Error> {
   validate_identifier(table)?;

   if records.is_empty() {
      return Err(Error::EmptyRecords {
         table: table.to_string(),
      });
   }

   let columns = unique_columns(records);
   for column in &columns {
      validate_identifier(column)?;
   }

   let rows: Vec<Vec<JsonValue>> = records
      .iter()
      .map(|record| {
         columns
            .iter()
            .map(|column| record.get(*column).cloned().unwrap_or(JsonValue::Null))
            .collect()
      })
      .collect();

   let column_list = columns.iter().copied().collect::<Vec<_>>().join(", ");
   let placeholders = vec!["?"; columns.len()].join(", ");
   let sql = format!("INSERT INTO {table} ({column_list}) VALUES ({placeholders})");

   Ok(Statement::new(sql, Binds::Batch(rows)))
}

/// Build an UPDATE setting every column of `updates`.
///
/// Columns are bound as `:1`, `:2`, ... in the mapping's key order.
/// `predicate` is appended after `WHERE` verbatim; it is caller-trusted SQL.
pub fn build_update(table: &str, updates: &Record, predicate: &str) -> Result<Statement, Error> {
   validate_identifier(table)?;

   if updates.is_empty() {
      return Err(Error::EmptyUpdates {
         table: table.to_string(),
      });
   }
   ensure_predicate("UPDATE", table, predicate)?;

   let mut assignments = Vec::with_capacity(updates.len());
   let mut values = Vec::with_capacity(updates.len());
   for (i, (column, value)) in updates.iter().enumerate() {
      validate_identifier(column)?;
      assignments.push(format!("{} = :{}", column, i + 1));
      values.push(value.clone());
   }

   let sql = format!(
      "UPDATE {table} SET {} WHERE {predicate}",
      assignments.join(", ")
   );

   Ok(Statement::new(sql, Binds::Positional(values)))
}

/// Build a DELETE restricted by `predicate`, appended verbatim.
pub fn build_delete(table: &str, predicate: &str) -> Result<Statement, Error> {
   validate_identifier(table)?;
   ensure_predicate("DELETE", table, predicate)?;

   Ok(Statement::new(
      format!("DELETE FROM {table} WHERE {predicate}"),
      Binds::None,
   ))
}

fn ensure_predicate(operation: &'static str, table: &str, predicate: &str) -> Result<(), Error> {
   if predicate.trim().is_empty() {
      return Err(Error::EmptyPredicate {
         operation,
         table: table.to_string(),
      });
   }
   Ok(())
}
