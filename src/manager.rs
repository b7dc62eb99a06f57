//! The database engine: a process-wide pooled connection source
//!
//! `DatabaseManager` wraps a sqlx `PgPool` with acquisition statistics and
//! the session/schema/connectivity operations the data layer exposes. It is
//! constructed once at startup from a [`DatabaseConfig`] and handed to
//! request handlers explicitly (usually behind an `Arc`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::{debug, error, info};

use crate::config::DatabaseConfig;
use crate::error::{DbResult, PoolError, SchemaError};
use crate::schema::SchemaRegistry;
use crate::session::Session;
use crate::stats::{HealthReport, PoolStats};

/// Process-wide pooled connection source with statistics tracking
pub struct DatabaseManager {
    pool: Pool<Postgres>,
    config: DatabaseConfig,
    acquire_count: AtomicU64,
    acquire_errors: AtomicU64,
    created_at: Instant,
}

impl DatabaseManager {
    /// Build the engine from configuration.
    ///
    /// The pool is created lazily: this validates the configuration and the
    /// connection URI (fatal on failure) but does not open a connection.
    /// Pool bounds follow the configuration: up to `pool_size +
    /// max_overflow` connections, each validated before reuse (pre-ping)
    /// and recycled once it exceeds `pool_recycle` seconds of age.
    pub async fn connect(config: DatabaseConfig) -> DbResult<Self> {
        config.validate()?;

        let uri = config.database_uri();
        debug!(
            "Creating database pool: max={}, timeout={}s, recycle={}s",
            config.pool.max_connections(),
            config.pool.pool_timeout,
            config.pool.pool_recycle
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.pool.max_connections())
            .min_connections(0)
            .acquire_timeout(Duration::from_secs(config.pool.pool_timeout))
            .max_lifetime(Duration::from_secs(config.pool.pool_recycle))
            .test_before_acquire(true)
            .connect_lazy(&uri)
            .map_err(|e| {
                error!("❌ Failed to create database pool: {}", e);
                PoolError::Configuration {
                    message: e.to_string(),
                }
            })?;

        info!(
            "✅ Database pool created for {}:{}/{} ({} max connections)",
            config.connection.host,
            config.connection.port,
            config.connection.database,
            config.pool.max_connections()
        );

        Ok(Self {
            pool,
            config,
            acquire_count: AtomicU64::new(0),
            acquire_errors: AtomicU64::new(0),
            created_at: Instant::now(),
        })
    }

    /// Acquire a new session bound to this engine.
    ///
    /// Blocks (asynchronously) up to the configured pool timeout, then
    /// fails with [`PoolError::AcquireTimeout`]. The returned [`Session`]
    /// gives its connection back to the pool when dropped.
    pub async fn session(&self) -> Result<Session, PoolError> {
        if self.pool.is_closed() {
            return Err(PoolError::PoolClosed);
        }

        self.acquire_count.fetch_add(1, Ordering::Relaxed);

        match self.pool.acquire().await {
            Ok(conn) => {
                debug!(
                    "Session opened (pool total: {}, idle: {})",
                    self.pool.size(),
                    self.pool.num_idle()
                );
                Ok(Session::new(conn))
            }
            Err(e) => {
                self.acquire_errors.fetch_add(1, Ordering::Relaxed);
                let pool_error = self.classify_error(e);
                error!("Failed to open session: {}", pool_error);
                Err(pool_error)
            }
        }
    }

    /// Try to acquire a session without waiting.
    ///
    /// Returns `Ok(None)` when no connection is idle but the pool still has
    /// capacity to grow; [`PoolError::Exhausted`] when every connection is
    /// in use.
    pub fn try_session(&self) -> Result<Option<Session>, PoolError> {
        if self.pool.is_closed() {
            return Err(PoolError::PoolClosed);
        }

        self.acquire_count.fetch_add(1, Ordering::Relaxed);

        match self.pool.try_acquire() {
            Some(conn) => Ok(Some(Session::new(conn))),
            None => {
                let max = self.config.pool.max_connections();
                if self.pool.size() >= max {
                    self.acquire_errors.fetch_add(1, Ordering::Relaxed);
                    Err(PoolError::Exhausted {
                        max_connections: max,
                    })
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Apply every registered table definition, in registration order.
    ///
    /// Each table uses create-if-absent DDL, so the operation is idempotent.
    /// Failures are logged with the offending table and propagated.
    pub async fn create_schema(&self, registry: &SchemaRegistry) -> Result<(), SchemaError> {
        for table in registry.tables() {
            sqlx::query(table.create_sql())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!("❌ Error creating table '{}': {}", table.name(), e);
                    SchemaError {
                        operation: "create",
                        table: table.name().to_string(),
                        source: e,
                    }
                })?;
            debug!("Table '{}' ensured", table.name());
        }
        info!("✅ Tables created successfully ({} tables)", registry.len());
        Ok(())
    }

    /// Drop every registered table, in reverse registration order.
    pub async fn drop_schema(&self, registry: &SchemaRegistry) -> Result<(), SchemaError> {
        for table in registry.tables_reversed() {
            sqlx::query(table.drop_sql())
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!("❌ Error dropping table '{}': {}", table.name(), e);
                    SchemaError {
                        operation: "drop",
                        table: table.name().to_string(),
                        source: e,
                    }
                })?;
        }
        info!("✅ Tables dropped successfully ({} tables)", registry.len());
        Ok(())
    }

    /// Execute a trivial round-trip query to verify reachability.
    ///
    /// Never errors: failures are logged and reported as `false`.
    pub async fn check_connection(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => {
                info!("✅ Database connection established");
                true
            }
            Err(e) => {
                error!("❌ Error connecting to database: {}", e);
                false
            }
        }
    }

    /// Timed connectivity probe combined with current pool statistics
    pub async fn health_check(&self) -> HealthReport {
        let start = Instant::now();
        let reachable = self.check_connection().await;
        let stats = self.stats();

        HealthReport {
            reachable,
            check_duration_ms: start.elapsed().as_millis() as u64,
            error_rate: stats.error_rate(),
            stats,
        }
    }

    /// Current pool statistics
    pub fn stats(&self) -> PoolStats {
        let total = self.pool.size();
        let idle = self.pool.num_idle() as u32;

        PoolStats {
            total_connections: total,
            idle_connections: idle,
            active_connections: total.saturating_sub(idle),
            acquire_count: self.acquire_count.load(Ordering::Relaxed),
            acquire_errors: self.acquire_errors.load(Ordering::Relaxed),
            uptime_secs: self.created_at.elapsed().as_secs(),
        }
    }

    /// The configuration this engine was built from
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// The underlying pool, for callers that integrate with sqlx directly
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }

    fn classify_error(&self, error: sqlx::Error) -> PoolError {
        match error {
            sqlx::Error::PoolTimedOut => PoolError::AcquireTimeout {
                timeout: self.config.pool.pool_timeout,
            },
            sqlx::Error::PoolClosed => PoolError::PoolClosed,
            other => PoolError::AcquisitionFailed(other),
        }
    }
}
