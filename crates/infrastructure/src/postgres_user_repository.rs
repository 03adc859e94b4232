//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;
use turnstile_application::UserRepository;
use turnstile_core::{AppError, AppResult};
use turnstile_domain::{User, UserAddress, UserDraft, UserId, UserName};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    address: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let name = UserName::new(row.name).map_err(|error| {
            AppError::Internal(format!("stored user {} has invalid name: {error}", row.id))
        })?;
        let address = UserAddress::new(row.address).map_err(|error| {
            AppError::Internal(format!("stored user {} has invalid address: {error}", row.id))
        })?;

        Ok(User::new(UserId::new(row.id), name, address))
    }
}

mod lookup;
mod write;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        self.exists_by_name_impl(name).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        self.find_by_name_impl(name).await
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.find_by_id_impl(id).await
    }

    async fn exists_by_id(&self, id: UserId) -> AppResult<bool> {
        self.exists_by_id_impl(id).await
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        self.find_all_impl().await
    }

    async fn save(&self, draft: UserDraft) -> AppResult<User> {
        match draft.id {
            Some(id) => self.update_impl(id, &draft).await,
            None => self.insert_impl(&draft).await,
        }
    }

    async fn delete_by_id(&self, id: UserId) -> AppResult<()> {
        self.delete_by_id_impl(id).await
    }
}

fn name_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a user with this name already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
