//! Distributed lock coordination over a shared key-value store.
//!
//! A lock is one store entry `key -> token` written with an expiry and only
//! when the key is absent. Only the holder of the token may delete it before
//! it expires. Acquisition polls on a fixed interval until it succeeds, the
//! wait timeout elapses, or the caller cancels.

mod config;
mod ports;
mod service;
mod state;


pub use config::{
    DEFAULT_LOCK_KEY_PREFIX, DEFAULT_LOCK_TTL, DEFAULT_LOCK_WAIT_TIMEOUT, DEFAULT_POLL_INTERVAL,
    LockCoordinatorConfig, LockOptions,
};
pub use ports::LockStore;
pub use service::{LockCoordinator, LockHandle};
pub use state::AcquireOutcome;
