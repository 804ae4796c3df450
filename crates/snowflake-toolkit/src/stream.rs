use std::pin::Pin;
use std::task::{Context, Poll};

use snowflake_conn_mgr::DriverRowStream;
use tokio_stream::Stream;
use tracing::{debug, error};

use crate::statement::Record;
use crate::{Error, Result};

/// Rows of a streamed SELECT, pulled one at a time as the driver produces them.
///
/// Single-pass and finite: once the driver's stream ends or yields an error
/// the stream is finished and keeps returning `None`. Driver failures arrive
/// as an `Err(Error::Execution)` item rather than on the call that created
/// the stream.
pub struct RowStream {
   inner: Option<DriverRowStream>,
   statement: String,
   rows_read: u64,
}

impl RowStream {
   pub fn new(statement: impl Into<String>, inner: DriverRowStream) -> Self {
      Self {
         inner: Some(inner),
         statement: statement.into(),
         rows_read: 0,
      }
   }

   /// The SELECT this stream is reading
   pub fn statement(&self) -> &str {
      &self.statement
   }

   /// Number of rows yielded so far
   pub fn rows_read(&self) -> u64 {
      self.rows_read
   }

   /// True once the stream has ended or failed
   pub fn is_finished(&self) -> bool {
      self.inner.is_none()
   }
}

impl Stream for RowStream {
   type Item = Result<Record>;

   fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
      let Some(inner) = self.inner.as_mut() else {
         return Poll::Ready(None);
      };

      match inner.as_mut().poll_next(cx) {
         Poll::Ready(Some(Ok(row))) => {
            self.rows_read += 1;
            Poll::Ready(Some(Ok(row)))
         }
         Poll::Ready(Some(Err(source))) => {
            error!(statement = %self.statement, error = %source, "Streamed select failed");
            self.inner = None;
            let statement = self.statement.clone();
            Poll::Ready(Some(Err(Error::execution(statement, source))))
         }
         Poll::Ready(None) => {
            debug!(rows = self.rows_read, "Streamed select finished");
            self.inner = None;
            Poll::Ready(None)
         }
         Poll::Pending => Poll::Pending,
      }
   }

   fn size_hint(&self) -> (usize, Option<usize>) {
      match &self.inner {
         Some(inner) => (0, inner.size_hint().1),
         None => (0, Some(0)),
      }
   }
}
