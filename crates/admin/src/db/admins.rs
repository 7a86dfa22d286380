//! Admin account repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopdesk_core::{AdminAccount, AdminId, Email};

use super::{RepositoryError, count_to_u64};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` admin account queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    email: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdminRow> for AdminAccount {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AdminId::new(row.id),
            email,
            created_at: row.created_at,
        })
    }
}

/// Admin row including the password hash, for login only.
#[derive(Debug, sqlx::FromRow)]
struct AdminLoginRow {
    id: i32,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin account operations.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all admins, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_all(&self) -> Result<Vec<AdminAccount>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminRow>(
            r"SELECT id, email, created_at
              FROM shop.admin_account
              ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an admin by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: AdminId) -> Result<Option<AdminAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, email, created_at FROM shop.admin_account WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get an admin and its password hash by email, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_login(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminAccount, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminLoginRow>(
            r"SELECT id, email, password_hash, created_at
              FROM shop.admin_account
              WHERE lower(email) = lower($1)",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|row| {
            let account = AdminAccount::try_from(AdminRow {
                id: row.id,
                email: row.email,
                created_at: row.created_at,
            })?;
            Ok((account, row.password_hash))
        })
        .transpose()
    }

    /// Create an admin with an already hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminAccount, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"INSERT INTO shop.admin_account (email, password_hash)
              VALUES ($1, $2)
              RETURNING id, email, created_at",
        )
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Count all admins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shop.admin_account")
            .fetch_one(self.pool)
            .await?;
        count_to_u64(count)
    }
}
