//! Identifier checks for names interpolated into statement text.
//!
//! Table and column names cannot be bound as parameters, so they end up in
//! the SQL verbatim. They are accepted when every dot-separated part is
//! either a bare identifier (`[A-Za-z_][A-Za-z0-9_$]*`, which Snowflake
//! upper-cases) or a double-quoted identifier with embedded quotes doubled.
//! Use [`quote_identifier`] to build the quoted form of a case-sensitive or
//! unusual name.

use crate::Error;

/// Validate a possibly qualified name such as `db.schema.table`.
pub fn validate_identifier(name: &str) -> Result<(), Error> {
   let invalid = || Error::InvalidIdentifier {
      name: name.to_string(),
   };

   if name.is_empty() {
      return Err(invalid());
   }

   let bytes = name.as_bytes();
   let mut i = 0;
   loop {
      i = if bytes[i] == b'"' {
         scan_quoted(bytes, i).ok_or_else(invalid)?
      } else {
         scan_bare(bytes, i).ok_or_else(invalid)?
      };

      match bytes.get(i) {
         None => return Ok(()),
         // A trailing dot leaves an empty part
         Some(b'.') if i + 1 < bytes.len() => i += 1,
         _ => return Err(invalid()),
      }
   }
}

/// Quote a single identifier part with double quotes.
///
/// Any embedded double quotes are doubled per SQL standard (`"` → `""`).
/// Quoted identifiers are case-sensitive in Snowflake.
pub fn quote_identifier(name: &str) -> String {
   format!("\"{}\"", name.replace('"', "\"\""))
}

/// Scan a bare identifier starting at `start`, returning the index just past it.
fn scan_bare(bytes: &[u8], start: usize) -> Option<usize> {
   let first = bytes[start];
   if !first.is_ascii_alphabetic() && first != b'_' {
      return None;
   }

   let mut i = start + 1;
   while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'$')
   {
      i += 1;
   }
   Some(i)
}

/// Scan a double-quoted identifier whose opening quote is at `start`,
/// returning the index just past the closing quote.
fn scan_quoted(bytes: &[u8], start: usize) -> Option<usize> {
   let mut i = start + 1;
   let mut empty = true;
   while i < bytes.len() {
      if bytes[i] == b'"' {
         if bytes.get(i + 1) == Some(&b'"') {
            i += 2;
            empty = false;
            continue;
         }
         return if empty { None } else { Some(i + 1) };
      }
      empty = false;
      i += 1;
   }
   // Unterminated
   None
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn identifier_valid_simple() {
      assert!(validate_identifier("loans").is_ok());
      assert!(validate_identifier("_private").is_ok());
      assert!(validate_identifier("col_123").is_ok());
      assert!(validate_identifier("AMOUNT$USD").is_ok());
   }

   #[test]
   fn identifier_valid_qualified() {
      assert!(validate_identifier("dbt_rob_brichler.temp").is_ok());
      assert!(validate_identifier("raw.public.loans").is_ok());
   }

   #[test]
   fn identifier_valid_quoted() {
      assert!(validate_identifier("\"My Table\"").is_ok());
      assert!(validate_identifier("raw.\"Mixed.Case\".loans").is_ok());
      assert!(validate_identifier("\"say \"\"hi\"\"\"").is_ok());
   }

   #[test]
   fn identifier_rejects_empty() {
      assert!(validate_identifier("").is_err());
      assert!(validate_identifier("\"\"").is_err());
      assert!(validate_identifier("a..b").is_err());
      assert!(validate_identifier("a.").is_err());
      assert!(validate_identifier(".a").is_err());
   }

   #[test]
   fn identifier_rejects_injection() {
      assert!(validate_identifier("t; DROP TABLE loans --").is_err());
      assert!(validate_identifier("t)--").is_err());
      assert!(validate_identifier("1bad").is_err());
      assert!(validate_identifier("col name").is_err());
      assert!(validate_identifier("\"unterminated").is_err());
      assert!(validate_identifier("\"ok\"x").is_err());
   }

   #[test]
   fn quote_doubles_embedded_quotes() {
      assert_eq!(quote_identifier("loans"), "\"loans\"");
      assert_eq!(quote_identifier("say \"hi\""), "\"say \"\"hi\"\"\"");
      assert!(validate_identifier(&quote_identifier("any thing; at all")).is_ok());
   }
}
