use tracing::{info, warn};
use turnstile_core::{AppError, AppResult};
use turnstile_domain::{User, UserDraft};

use super::{UpsertOutcome, UpsertUserInput, UserInput, UserService};
use super::{already_exists, conflict_as_already_exists};
use crate::LockCoordinator;

impl UserService {
    /// Creates a user whose name has not been taken yet.
    ///
    /// Fails with `LockUnavailable` when the creation lock cannot be acquired
    /// in time and with `Conflict` when the name already exists, whether that
    /// is seen by the existence check or by the store's unique constraint.
    /// The lock is released on every path once it was acquired, including
    /// when this future is dropped before it completes.
    pub async fn create_unique(&self, input: UserInput) -> AppResult<User> {
        let (name, address) = input.validate()?;
        let resource_key = self.creation_resource_key(&name);

        let handle = self
            .lock_coordinator
            .acquire_with(resource_key.as_str(), self.lock_options())
            .await?;
        let Some(token) = handle.token() else {
            warn!(
                lock_key = handle.key(),
                outcome = ?handle.outcome(),
                "user creation lock unavailable"
            );
            return Err(AppError::LockUnavailable(
                "unable to acquire lock for user creation, please try again".to_owned(),
            ));
        };

        let guard = CreationLock {
            coordinator: self.lock_coordinator.clone(),
            key: handle.key().to_owned(),
            token: Some(token.to_owned()),
        };
        let result = self.insert_if_absent(UserDraft::new(name, address)).await;
        guard.release().await;

        result
    }

    /// Updates the user identified by `input.id`, or creates one when absent.
    pub async fn upsert(&self, input: UpsertUserInput) -> AppResult<(User, UpsertOutcome)> {
        match input.id {
            Some(id) => {
                let user = self.update_existing(id, input.user).await?;
                Ok((user, UpsertOutcome::Updated))
            }
            None => {
                let user = self.create_unique(input.user).await?;
                Ok((user, UpsertOutcome::Created))
            }
        }
    }

    async fn insert_if_absent(&self, draft: UserDraft) -> AppResult<User> {
        if self
            .user_repository
            .exists_by_name(draft.name.as_str())
            .await?
        {
            return Err(already_exists(&draft.name));
        }

        let name = draft.name.clone();
        let user = self
            .user_repository
            .save(draft)
            .await
            .map_err(|error| conflict_as_already_exists(error, &name))?;

        info!(user_id = %user.id(), "user created");
        Ok(user)
    }
}

/// Creation lock owned by one `create_unique` call.
///
/// Dropping it before [`CreationLock::release`] finished hands the release
/// to a background task on the current runtime.
struct CreationLock {
    coordinator: LockCoordinator,
    key: String,
    token: Option<String>,
}

impl CreationLock {
    async fn release(mut self) {
        let Some(token) = self.token.clone() else {
            return;
        };

        let released = self.coordinator.release(self.key.as_str(), token.as_str()).await;
        self.token = None;
        log_release(self.key.as_str(), released);
    }
}

impl Drop for CreationLock {
    fn drop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                lock_key = self.key.as_str(),
                "no runtime to release abandoned user creation lock"
            );
            return;
        };

        let coordinator = self.coordinator.clone();
        let key = std::mem::take(&mut self.key);
        runtime.spawn(async move {
            let released = coordinator.release(key.as_str(), token.as_str()).await;
            log_release(key.as_str(), released);
        });
    }
}

fn log_release(lock_key: &str, released: AppResult<bool>) {
    match released {
        Ok(true) => {}
        Ok(false) => warn!(
            lock_key,
            "user creation lock expired before it was released"
        ),
        Err(error) => warn!(
            error = %error,
            lock_key,
            "failed to release user creation lock"
        ),
    }
}
