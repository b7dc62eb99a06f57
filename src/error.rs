//! Error types for the database layer
//!
//! Configuration errors are fatal at startup, pool errors surface to the
//! caller of `session()`, and schema errors carry the failing table so the
//! caller can report it.

use thiserror::Error;

/// Result type alias for database operations
pub type DbResult<T> = Result<T, DatabaseError>;

/// Environment/configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Validation failed for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    #[error("Malformed connection URI: {0}")]
    MalformedUri(#[from] url::ParseError),
}

/// Connection pool error types
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Connection acquisition failed: {0}")]
    AcquisitionFailed(#[source] sqlx::Error),

    #[error("Pool is closed")]
    PoolClosed,

    #[error("Connection acquisition timed out after {timeout}s")]
    AcquireTimeout { timeout: u64 },

    #[error("Pool exhausted: all {max_connections} connections in use")]
    Exhausted { max_connections: u32 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Schema operation failure, carrying the operation and table that failed
#[derive(Debug, Error)]
#[error("Schema operation '{operation}' failed for table '{table}': {source}")]
pub struct SchemaError {
    pub operation: &'static str,
    pub table: String,
    #[source]
    pub source: sqlx::Error,
}

/// Crate-wide error umbrella
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_error_display() {
        let timeout = PoolError::AcquireTimeout { timeout: 10 };
        let closed = PoolError::PoolClosed;
        let exhausted = PoolError::Exhausted {
            max_connections: 150,
        };

        assert!(timeout.to_string().contains("timed out after 10s"));
        assert!(closed.to_string().contains("closed"));
        assert!(exhausted.to_string().contains("150 connections in use"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "POSTGRES_PORT".to_string(),
            value: "not-a-port".to_string(),
            expected: "valid port number (1-65535)".to_string(),
        };
        assert!(err.to_string().contains("POSTGRES_PORT"));
        assert!(err.to_string().contains("not-a-port"));
    }

    #[test]
    fn test_database_error_wraps_variants() {
        let err: DatabaseError = PoolError::PoolClosed.into();
        assert!(matches!(err, DatabaseError::Pool(_)));

        let err: DatabaseError = ConfigError::ValidationFailed {
            field: "host".to_string(),
            reason: "empty".to_string(),
        }
        .into();
        assert!(matches!(err, DatabaseError::Config(_)));
    }

    #[test]
    fn test_schema_error_names_table() {
        let err = SchemaError {
            operation: "create",
            table: "users".to_string(),
            source: sqlx::Error::PoolClosed,
        };
        let msg = err.to_string();
        assert!(msg.contains("'create'"));
        assert!(msg.contains("'users'"));
    }
}
