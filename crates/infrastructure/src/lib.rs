//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_lock_store;
mod in_memory_user_repository;
mod postgres_user_repository;
mod redis_lock_store;

pub use in_memory_lock_store::InMemoryLockStore;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use redis_lock_store::RedisLockStore;
