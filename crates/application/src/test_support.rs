//! Hand-written fakes shared by the service tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use turnstile_core::{AppError, AppResult};
use turnstile_domain::{User, UserDraft, UserId};

use crate::{LockStore, UserRepository};

/// Lock store fake with expiry driven by tokio's clock.
#[derive(Default)]
pub(crate) struct FakeLockStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    set_delay: Option<Duration>,
    set_calls: AtomicUsize,
    release_calls: AtomicUsize,
    fail_sets: AtomicBool,
    fail_releases: AtomicBool,
}

impl FakeLockStore {
    /// Every set call sleeps for `delay` before touching the entries.
    pub(crate) fn with_set_delay(delay: Duration) -> Self {
        Self {
            set_delay: Some(delay),
            ..Self::default()
        }
    }

    pub(crate) async fn holder(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(token, _)| token.clone())
    }

    pub(crate) async fn live_entries(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub(crate) fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_sets(&self) {
        self.fail_sets.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_releases(&self) {
        self.fail_releases.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LockStore for FakeLockStore {
    async fn set_if_absent_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> AppResult<bool> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.set_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(AppError::Internal("failed to connect to lock store".to_owned()));
        }

        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        if entries
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at > now)
        {
            return Ok(false);
        }

        entries.insert(key.to_owned(), (value.to_owned(), now + ttl));
        Ok(true)
    }

    async fn compare_and_delete(&self, key: &str, expected_value: &str) -> AppResult<bool> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_releases.load(Ordering::SeqCst) {
            return Err(AppError::Internal("failed to connect to lock store".to_owned()));
        }

        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let owned = entries
            .get(key)
            .is_some_and(|(token, expires_at)| token == expected_value && *expires_at > now);
        if owned {
            entries.remove(key);
        }

        Ok(owned)
    }
}

/// User repository fake enforcing name uniqueness like the real table.
#[derive(Default)]
pub(crate) struct FakeUserRepository {
    users: Mutex<BTreeMap<UserId, User>>,
    next_id: AtomicUsize,
    save_delay: Option<Duration>,
    hide_existing_names: AtomicBool,
    fail_saves: AtomicBool,
    save_calls: AtomicUsize,
}

impl FakeUserRepository {
    /// Every save sleeps for `delay` before writing.
    pub(crate) fn with_save_delay(delay: Duration) -> Self {
        Self {
            save_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Makes `exists_by_name` and `find_by_name` report nothing, as if a
    /// concurrent writer slipped in between the check and the write.
    pub(crate) fn hide_existing_names(&self) {
        self.hide_existing_names.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub(crate) fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn count(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<User>> {
        if self.hide_existing_names.load(Ordering::SeqCst) {
            return Ok(None);
        }

        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|user| user.name().as_str() == name)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: UserId) -> AppResult<bool> {
        Ok(self.users.lock().await.contains_key(&id))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().await.values().cloned().collect())
    }

    async fn save(&self, draft: UserDraft) -> AppResult<User> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Internal("failed to save user: disk full".to_owned()));
        }

        let mut users = self.users.lock().await;
        if users
            .values()
            .any(|user| user.name() == &draft.name && Some(user.id()) != draft.id)
        {
            return Err(AppError::Conflict("duplicate key value".to_owned()));
        }

        let id = match draft.id {
            Some(id) if users.contains_key(&id) => id,
            Some(id) => return Err(AppError::NotFound(format!("user {id} does not exist"))),
            None => {
                let next = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                UserId::new(i64::try_from(next).unwrap_or(i64::MAX))
            }
        };

        let user = draft.into_user(id);
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: UserId) -> AppResult<()> {
        self.users.lock().await.remove(&id);
        Ok(())
    }
}
