use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use turnstile_application::UserRepository;
use turnstile_core::{AppError, AppResult};
use turnstile_domain::{User, UserDraft, UserId};

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<UserId, User>,
    last_id: i64,
}

/// In-memory user repository with the same name uniqueness rule as the
/// `users` table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let table = self.table.read().await;
        Ok(table.rows.values().any(|user| user.name().as_str() == name))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|user| user.name().as_str() == name)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: UserId) -> AppResult<bool> {
        Ok(self.table.read().await.rows.contains_key(&id))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn save(&self, draft: UserDraft) -> AppResult<User> {
        let mut table = self.table.write().await;

        let name_taken = table
            .rows
            .values()
            .any(|user| user.name() == &draft.name && Some(user.id()) != draft.id);
        if name_taken {
            return Err(AppError::Conflict(
                "a user with this name already exists".to_owned(),
            ));
        }

        let id = match draft.id {
            Some(id) if table.rows.contains_key(&id) => id,
            Some(id) => {
                return Err(AppError::NotFound(format!("user not found with id: {id}")));
            }
            None => {
                table.last_id += 1;
                UserId::new(table.last_id)
            }
        };

        let user = draft.into_user(id);
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: UserId) -> AppResult<()> {
        self.table.write().await.rows.remove(&id);
        Ok(())
    }
}
