use tracing::info;
use turnstile_core::AppResult;
use turnstile_domain::{User, UserId};

use super::{UserInput, UserService};
use super::{already_exists, conflict_as_already_exists, not_found};

impl UserService {
    /// Overwrites name and address of an existing user.
    ///
    /// Takes no lock: the row is addressed by identity and written once. A
    /// rename onto a name held by another user fails with `Conflict`.
    pub async fn update_existing(&self, id: UserId, input: UserInput) -> AppResult<User> {
        let (name, address) = input.validate()?;

        let existing = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if let Some(holder) = self.user_repository.find_by_name(name.as_str()).await?
            && holder.id() != id
        {
            return Err(already_exists(&name));
        }

        let draft = existing.into_draft_with(name.clone(), address);
        let user = self
            .user_repository
            .save(draft)
            .await
            .map_err(|error| conflict_as_already_exists(error, &name))?;

        info!(user_id = %user.id(), "user updated");
        Ok(user)
    }

    /// Returns one user by identifier.
    pub async fn get_by_id(&self, id: UserId) -> AppResult<User> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Lists all users ordered by identifier.
    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        self.user_repository.find_all().await
    }

    /// Deletes one user by identifier.
    pub async fn delete(&self, id: UserId) -> AppResult<()> {
        if !self.user_repository.exists_by_id(id).await? {
            return Err(not_found(id));
        }

        self.user_repository.delete_by_id(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}
