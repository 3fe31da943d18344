//! Owner persistence for both owner kinds.
//!
//! Users and examples share one row shape, so a single store serves both.
//! The table name comes from [`OwnerKind::table`], a closed set of
//! `'static` identifiers, and is the only part of the SQL built with
//! `format!`. Every value is bound as a parameter.

use birdwatch_types::{Owner, OwnerId, OwnerKind};
use uuid::Uuid;

use crate::error::DbError;
use crate::routing::RoutingPool;

/// Operations on the `users` or `examples` table.
pub struct OwnerStore<'a> {
    pool: &'a RoutingPool,
    kind: OwnerKind,
}

impl<'a> OwnerStore<'a> {
    /// Create a store for owners of `kind`.
    pub const fn new(pool: &'a RoutingPool, kind: OwnerKind) -> Self {
        Self { pool, kind }
    }

    /// Whether an owner with this username exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn exists_by_username(&self, username: &str) -> Result<bool, DbError> {
        self.exists_by("username", username).await
    }

    /// Whether an owner with this email exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn exists_by_email(&self, email: &str) -> Result<bool, DbError> {
        self.exists_by("email", email).await
    }

    /// Load an owner by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_by_id(&self, id: OwnerId) -> Result<Option<Owner>, DbError> {
        let sql = format!(
            "SELECT id, username, email, password_hash FROM {} WHERE id = $1",
            self.kind.table()
        );
        let row = sqlx::query_as::<_, OwnerRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool.reader())
            .await?;

        Ok(row.map(|r| r.into_owner(self.kind)))
    }

    /// Load an owner by username.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Owner>, DbError> {
        self.find_by("username", username).await
    }

    /// Load an owner by email.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Owner>, DbError> {
        self.find_by("email", email).await
    }

    /// Insert a new owner.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UniqueViolation`] if the username or email is
    /// already taken, [`DbError::Postgres`] for other failures.
    pub async fn insert(&self, owner: &Owner) -> Result<(), DbError> {
        let sql = format!(
            "INSERT INTO {} (id, username, email, password_hash) VALUES ($1, $2, $3, $4)",
            self.kind.table()
        );
        sqlx::query(&sql)
            .bind(owner.id.into_inner())
            .bind(&owner.username)
            .bind(&owner.email)
            .bind(&owner.password_hash)
            .execute(self.pool.writer())
            .await?;

        tracing::debug!(kind = %self.kind, owner_id = %owner.id, "Inserted owner");
        Ok(())
    }

    /// Overwrite the mutable fields of an existing owner.
    ///
    /// Returns `false` if no row matched the owner's ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UniqueViolation`] if the new username or email is
    /// already taken, [`DbError::Postgres`] for other failures.
    pub async fn update(&self, owner: &Owner) -> Result<bool, DbError> {
        let sql = format!(
            "UPDATE {} SET username = $2, email = $3, password_hash = $4 WHERE id = $1",
            self.kind.table()
        );
        let result = sqlx::query(&sql)
            .bind(owner.id.into_inner())
            .bind(&owner.username)
            .bind(&owner.email)
            .bind(&owner.password_hash)
            .execute(self.pool.writer())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by(&self, column: &'static str, value: &str) -> Result<bool, DbError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE {column} = $1)",
            self.kind.table()
        );
        let (exists,): (bool,) = sqlx::query_as(&sql)
            .bind(value)
            .fetch_one(self.pool.reader())
            .await?;
        Ok(exists)
    }

    async fn find_by(&self, column: &'static str, value: &str) -> Result<Option<Owner>, DbError> {
        let sql = format!(
            "SELECT id, username, email, password_hash FROM {} WHERE {column} = $1",
            self.kind.table()
        );
        let row = sqlx::query_as::<_, OwnerRow>(&sql)
            .bind(value)
            .fetch_optional(self.pool.reader())
            .await?;

        Ok(row.map(|r| r.into_owner(self.kind)))
    }
}

/// A row from the `users` or `examples` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnerRow {
    /// Owner UUID.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Encoded password.
    pub password_hash: String,
}

impl OwnerRow {
    /// Attach the owner kind the row was read for.
    pub fn into_owner(self, kind: OwnerKind) -> Owner {
        Owner {
            id: OwnerId::from(self.id),
            kind,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}
