use async_trait::async_trait;
use turnstile_core::AppResult;
use turnstile_domain::{User, UserDraft, UserId};

/// Repository port for user persistence.
///
/// The backing store owns a uniqueness constraint on the user name and
/// reports violations from [`UserRepository::save`] as `AppError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns whether a user with this exact name exists.
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    /// Finds a user by its unique name.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Returns whether a user with this identifier exists.
    async fn exists_by_id(&self, id: UserId) -> AppResult<bool>;

    /// Lists all users ordered by identifier.
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Inserts a draft without identity or overwrites the row it identifies.
    async fn save(&self, draft: UserDraft) -> AppResult<User>;

    /// Deletes the user with this identifier.
    async fn delete_by_id(&self, id: UserId) -> AppResult<()>;
}
