//! Read/write routing between a primary and a replica.
//!
//! Writes always go to the primary. Reads go to the replica, which may lag
//! slightly behind. When no replica is configured both roles share the
//! primary pool.
//!
//! ```text
//! OwnerStore / ObservationStore
//!     |
//!     +-- writer() --> primary (INSERT, UPDATE)
//!     |
//!     +-- reader() --> replica (SELECT)
//! ```

use sqlx::PgPool;

use crate::error::DbError;
use crate::postgres::{PostgresConfig, PostgresPool};

/// Which side of the routing pair a statement is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Read-only statements, served by the replica.
    Read,
    /// Statements that modify data, served by the primary.
    Write,
}

/// A primary/replica pool pair.
#[derive(Clone)]
pub struct RoutingPool {
    primary: PostgresPool,
    replica: Option<PostgresPool>,
}

impl RoutingPool {
    /// Connect the primary and, if configured, the replica.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if either pool fails to connect.
    pub async fn connect(
        primary: &PostgresConfig,
        replica: Option<&PostgresConfig>,
    ) -> Result<Self, DbError> {
        let primary_pool = PostgresPool::connect(primary, "primary").await?;
        let replica_pool = match replica {
            Some(config) => Some(PostgresPool::connect(config, "replica").await?),
            None => {
                tracing::info!("No replica configured, reads go to the primary");
                None
            }
        };

        Ok(Self {
            primary: primary_pool,
            replica: replica_pool,
        })
    }

    /// Build a routing pool from already connected pools.
    pub const fn from_pools(primary: PostgresPool, replica: Option<PostgresPool>) -> Self {
        Self { primary, replica }
    }

    /// Pool for the given route.
    pub fn route(&self, route: Route) -> &PgPool {
        match (route, &self.replica) {
            (Route::Read, Some(replica)) => replica.pool(),
            _ => self.primary.pool(),
        }
    }

    /// Pool for read-only statements.
    pub fn reader(&self) -> &PgPool {
        self.route(Route::Read)
    }

    /// Pool for statements that modify data.
    pub fn writer(&self) -> &PgPool {
        self.route(Route::Write)
    }

    /// Run migrations against the primary.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if any migration fails.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        self.primary.run_migrations().await
    }

    /// Whether reads are served by a separate replica.
    pub const fn has_replica(&self) -> bool {
        self.replica.is_some()
    }

    /// Close both pools.
    pub async fn close(&self) {
        if let Some(replica) = &self.replica {
            replica.close().await;
        }
        self.primary.close().await;
        tracing::info!("PostgreSQL pools closed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lazy(database: &str) -> PostgresPool {
        let url = format!("postgresql://birdwatch@localhost:5432/{database}");
        PostgresPool::connect_lazy(&PostgresConfig::new(&url)).unwrap()
    }

    fn database(pool: &PgPool) -> Option<String> {
        pool.connect_options().get_database().map(str::to_owned)
    }

    #[tokio::test]
    async fn reads_go_to_replica_and_writes_to_primary() {
        let routing = RoutingPool::from_pools(lazy("primary_db"), Some(lazy("replica_db")));
        assert!(routing.has_replica());
        assert_eq!(database(routing.reader()).as_deref(), Some("replica_db"));
        assert_eq!(database(routing.writer()).as_deref(), Some("primary_db"));
    }

    #[tokio::test]
    async fn reads_fall_back_to_primary_without_replica() {
        let routing = RoutingPool::from_pools(lazy("primary_db"), None);
        assert!(!routing.has_replica());
        assert_eq!(database(routing.reader()).as_deref(), Some("primary_db"));
        assert_eq!(database(routing.route(Route::Write)).as_deref(), Some("primary_db"));
    }

    #[test]
    fn malformed_url_is_a_config_error() {
        let result = PostgresPool::connect_lazy(&PostgresConfig::new("not a url"));
        assert!(matches!(result, Err(DbError::Config(_))));
    }
}
