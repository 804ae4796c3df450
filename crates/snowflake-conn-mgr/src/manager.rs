//! Lazily opened, reused driver connection

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::driver::{Connection, Driver};
use crate::{ConnectionConfig, Error, Result};

/// Lifecycle of the managed connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
   /// No connection has been opened, or the last attempt failed
   Disconnected,
   /// A connect call to the driver is in flight
   Connecting,
   /// A connection is held. It may since have gone stale; liveness is only
   /// rechecked on the next [`ConnectionManager::acquire`].
   Connected,
}

impl ConnectionState {
   fn as_u8(self) -> u8 {
      match self {
         ConnectionState::Disconnected => 0,
         ConnectionState::Connecting => 1,
         ConnectionState::Connected => 2,
      }
   }

   fn from_u8(value: u8) -> Self {
      match value {
         1 => ConnectionState::Connecting,
         2 => ConnectionState::Connected,
         _ => ConnectionState::Disconnected,
      }
   }
}

/// Owns at most one driver connection and opens it on first use.
///
/// ## State Management
///
/// - **`slot`**: the current connection, behind an async mutex so the
///   check-then-connect sequence runs for one caller at a time. Concurrent
///   callers on a disconnected manager wait for the first connect and then
///   share its connection.
/// - **`state`**: mirror of the lifecycle for lock-free reads
///
/// ## Usage Pattern
///
/// ```text
/// 1. Create the manager with a driver and configuration (nothing is opened)
/// 2. acquire() before every statement
///    - held and live      -> reuse
///    - absent or not live -> connect through the driver
/// 3. Drop the manager to release the connection
/// ```
pub struct ConnectionManager<D: Driver> {
   driver: D,

   config: ConnectionConfig,

   slot: Mutex<Option<Arc<D::Connection>>>,

   state: AtomicU8,
}

impl<D: Driver> ConnectionManager<D> {
   /// Create a manager. No connection is opened until [`acquire`](Self::acquire).
   pub fn new(driver: D, config: ConnectionConfig) -> Self {
      Self {
         driver,
         config,
         slot: Mutex::new(None),
         state: AtomicU8::new(ConnectionState::Disconnected.as_u8()),
      }
   }

   /// Configuration used for every connect attempt
   pub fn config(&self) -> &ConnectionConfig {
      &self.config
   }

   /// The underlying driver
   pub fn driver(&self) -> &D {
      &self.driver
   }

   /// Current lifecycle state
   pub fn state(&self) -> ConnectionState {
      ConnectionState::from_u8(self.state.load(Ordering::Acquire))
   }

   fn set_state(&self, state: ConnectionState) {
      self.state.store(state.as_u8(), Ordering::Release);
   }

   /// Return a live connection, opening a new one if none is held or the held
   /// one no longer reports itself as up.
   pub async fn acquire(&self) -> Result<Arc<D::Connection>> {
      let mut slot = self.slot.lock().await;

      if let Some(conn) = slot.as_ref() {
         if conn.is_up() {
            debug!(account = %self.config.account, "Reusing live connection");
            return Ok(Arc::clone(conn));
         }
         debug!(account = %self.config.account, "Held connection is no longer up, reconnecting");
      }

      // A stale handle is replaced, never reused
      *slot = None;

      match self.connect().await {
         Ok(conn) => {
            *slot = Some(Arc::clone(&conn));
            Ok(conn)
         }
         Err(e) => {
            error!(account = %self.config.account, error = %e, "Connection failed");
            Err(e)
         }
      }
   }

   async fn connect(&self) -> Result<Arc<D::Connection>> {
      self.config.validate()?;

      let guard = ConnectingGuard::new(self);

      info!(
         account = %self.config.account,
         username = %self.config.username,
         role = ?self.config.role,
         warehouse = ?self.config.warehouse,
         database = ?self.config.database,
         schema = ?self.config.schema,
         "Connecting to Snowflake"
      );

      let conn = self
         .driver
         .connect(&self.config)
         .await
         .map_err(|source| Error::Connect {
            account: self.config.account.clone(),
            source,
         })?;

      if !conn.is_up() {
         return Err(Error::NotLive {
            account: self.config.account.clone(),
         });
      }

      guard.connected();
      info!(account = %self.config.account, "Connected");

      Ok(Arc::new(conn))
   }
}

/// Marks the manager as connecting for as long as it lives. Falls back to
/// `Disconnected` on drop unless [`connected`](Self::connected) was called,
/// which also covers a caller dropping the acquire future mid-connect.
struct ConnectingGuard<'a> {
   state: &'a AtomicU8,
   connected: bool,
}

impl<'a> ConnectingGuard<'a> {
   fn new<D: Driver>(manager: &'a ConnectionManager<D>) -> Self {
      manager.set_state(ConnectionState::Connecting);
      Self {
         state: &manager.state,
         connected: false,
      }
   }

   fn connected(mut self) {
      self.connected = true;
   }
}

impl Drop for ConnectingGuard<'_> {
   fn drop(&mut self) {
      let state = if self.connected {
         ConnectionState::Connected
      } else {
         ConnectionState::Disconnected
      };
      self.state.store(state.as_u8(), Ordering::Release);
   }
}
