//! Per-request database sessions
//!
//! A `Session` is a unit of work bound to one connection checked out of the
//! engine's pool. Release is tied to scope: dropping the guard returns the
//! connection on every exit path, normal completion and unwind alike, which
//! replaces generator-style yield/finally session management.

use std::ops::{Deref, DerefMut};

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, Postgres};
use tracing::trace;

/// Scoped unit of work over a pooled connection.
///
/// Derefs to [`PgConnection`], so sqlx queries run against it directly:
///
/// ```ignore
/// let mut session = manager.session().await?;
/// sqlx::query("SELECT 1").execute(&mut *session).await?;
/// ```
///
/// Sessions are not shared across logical requests; each request acquires
/// its own from the engine.
pub struct Session {
    conn: PoolConnection<Postgres>,
}

impl Session {
    pub(crate) fn new(conn: PoolConnection<Postgres>) -> Self {
        Self { conn }
    }

    /// Execute a statement on this session, returning the affected row count
    pub async fn execute(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(sql).execute(&mut *self.conn).await?;
        Ok(result.rows_affected())
    }

    /// Trivial round-trip query to verify the borrowed connection is live
    pub async fn ping(&mut self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&mut *self.conn).await?;
        Ok(())
    }
}

impl Deref for Session {
    type Target = PgConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // The wrapped PoolConnection returns itself to the pool when dropped
        trace!("Session closed, connection returned to pool");
    }
}
