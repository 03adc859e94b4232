use std::time::Duration;

use redis::AsyncCommands;
use turnstile_application::LockStore;
use turnstile_core::AppError;

use super::RedisLockStore;

fn test_client() -> Option<redis::Client> {
    let Ok(redis_url) = std::env::var("REDIS_URL") else {
        return None;
    };

    match redis::Client::open(redis_url.as_str()) {
        Ok(client) => Some(client),
        Err(error) => panic!("invalid REDIS_URL in test: {error}"),
    }
}

fn unique_key() -> String {
    format!("lock:test:{}", uuid::Uuid::new_v4())
}

#[tokio::test]
async fn set_if_absent_refuses_second_writer_and_applies_ttl() {
    let Some(client) = test_client() else {
        return;
    };
    let store = RedisLockStore::new(client.clone());
    let key = unique_key();

    let first = store
        .set_if_absent_with_expiry(key.as_str(), "token-a", Duration::from_secs(30))
        .await;
    let second = store
        .set_if_absent_with_expiry(key.as_str(), "token-b", Duration::from_secs(30))
        .await;

    assert!(matches!(first, Ok(true)));
    assert!(matches!(second, Ok(false)));

    let mut connection = match client.get_multiplexed_async_connection().await {
        Ok(connection) => connection,
        Err(error) => panic!("failed to connect to redis in test: {error}"),
    };
    let stored: Option<String> = connection.get(key.as_str()).await.unwrap_or(None);
    let ttl_millis: i64 = connection.pttl(key.as_str()).await.unwrap_or(-1);
    assert_eq!(stored.as_deref(), Some("token-a"));
    assert!(ttl_millis > 0 && ttl_millis <= 30_000);

    assert!(matches!(
        store.compare_and_delete(key.as_str(), "token-a").await,
        Ok(true)
    ));
}

#[tokio::test]
async fn compare_and_delete_only_removes_matching_token() {
    let Some(client) = test_client() else {
        return;
    };
    let store = RedisLockStore::new(client);
    let key = unique_key();
    let _ = store
        .set_if_absent_with_expiry(key.as_str(), "token-a", Duration::from_secs(30))
        .await;

    let foreign = store.compare_and_delete(key.as_str(), "token-b").await;
    let owner = store.compare_and_delete(key.as_str(), "token-a").await;
    let repeated = store.compare_and_delete(key.as_str(), "token-a").await;

    assert!(matches!(foreign, Ok(false)));
    assert!(matches!(owner, Ok(true)));
    assert!(matches!(repeated, Ok(false)));
}

#[tokio::test]
async fn expired_entry_can_be_reacquired() {
    let Some(client) = test_client() else {
        return;
    };
    let store = RedisLockStore::new(client);
    let key = unique_key();
    let _ = store
        .set_if_absent_with_expiry(key.as_str(), "token-a", Duration::from_millis(20))
        .await;

    tokio::time::sleep(Duration::from_millis(60)).await;

    let reacquired = store
        .set_if_absent_with_expiry(key.as_str(), "token-b", Duration::from_secs(30))
        .await;
    assert!(matches!(reacquired, Ok(true)));
    assert!(matches!(
        store.compare_and_delete(key.as_str(), "token-a").await,
        Ok(false)
    ));
    let _ = store.compare_and_delete(key.as_str(), "token-b").await;
}

#[tokio::test]
async fn unreachable_server_is_an_internal_error() {
    let client = match redis::Client::open("redis://127.0.0.1:1/") {
        Ok(client) => client,
        Err(error) => panic!("static redis url should parse: {error}"),
    };
    let store = RedisLockStore::new(client);

    let result = store
        .set_if_absent_with_expiry("lock:test:unreachable", "token", Duration::from_secs(1))
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert!(!store.manager.initialized());
}

#[tokio::test]
async fn clones_share_one_connection() {
    let Some(client) = test_client() else {
        return;
    };
    let store = RedisLockStore::new(client);
    let clone = store.clone();
    let key = unique_key();

    let acquired = clone
        .set_if_absent_with_expiry(key.as_str(), "token-a", Duration::from_secs(30))
        .await;

    assert!(matches!(acquired, Ok(true)));
    assert!(store.manager.initialized());
    assert!(matches!(
        store.compare_and_delete(key.as_str(), "token-a").await,
        Ok(true)
    ));
}
