#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sso_auth::auth::adapters::memory::InMemoryStorage;
use sso_auth::auth::context::RequestContext;
use sso_auth::auth::domain::{App, StorageError, User};
use sso_auth::auth::password::{Argon2Hasher, HashError, PasswordHasher};
use sso_auth::auth::ports::{AppProvider, UserProvider};
use sso_auth::auth::Auth;
use sso_auth::config::PasswordConfig;

pub const APP_ID: i32 = 1;
pub const APP_SECRET: &str = "test-secret";

pub fn cheap_password_config() -> PasswordConfig {
    PasswordConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn test_app() -> App {
    App {
        id: APP_ID,
        name: "test".to_string(),
        secret: APP_SECRET.to_string(),
    }
}

pub fn storage_with_app() -> Arc<InMemoryStorage> {
    let storage = Arc::new(InMemoryStorage::new());
    storage.insert_app(test_app()).expect("seed app");
    storage
}

pub fn auth_over(
    users: Arc<dyn UserProvider>,
    apps: Arc<dyn AppProvider>,
    ttl: time::Duration,
) -> Auth {
    let hasher = Arc::new(Argon2Hasher::new(&cheap_password_config()).expect("hasher"));
    Auth::new(users, apps, hasher, ttl)
}

/// Auth service over a fresh in-memory store seeded with [`test_app`].
pub fn new_auth() -> (Arc<InMemoryStorage>, Auth) {
    let storage = storage_with_app();
    let auth = auth_over(storage.clone(), storage.clone(), time::Duration::hours(1));
    (storage, auth)
}

/// Provider whose every call fails with an unexpected storage error.
pub struct BrokenStorage;

#[async_trait]
impl UserProvider for BrokenStorage {
    async fn save_user(&self, _: &RequestContext, _: &str, _: &str) -> Result<i64, StorageError> {
        Err(StorageError::Other("disk on fire".to_string()))
    }

    async fn user(&self, _: &RequestContext, _: &str) -> Result<User, StorageError> {
        Err(StorageError::Other("disk on fire".to_string()))
    }

    async fn is_admin(&self, _: &RequestContext, _: i64) -> Result<bool, StorageError> {
        Err(StorageError::Other("disk on fire".to_string()))
    }
}

#[async_trait]
impl AppProvider for BrokenStorage {
    async fn app(&self, _: &RequestContext, _: i32) -> Result<App, StorageError> {
        Err(StorageError::Other("disk on fire".to_string()))
    }
}

/// Provider whose calls never complete.
pub struct HangingStorage;

#[async_trait]
impl UserProvider for HangingStorage {
    async fn save_user(&self, _: &RequestContext, _: &str, _: &str) -> Result<i64, StorageError> {
        std::future::pending().await
    }

    async fn user(&self, _: &RequestContext, _: &str) -> Result<User, StorageError> {
        std::future::pending().await
    }

    async fn is_admin(&self, _: &RequestContext, _: i64) -> Result<bool, StorageError> {
        std::future::pending().await
    }
}

#[async_trait]
impl AppProvider for HangingStorage {
    async fn app(&self, _: &RequestContext, _: i32) -> Result<App, StorageError> {
        std::future::pending().await
    }
}

/// Cheap Argon2 hasher that counts how often each entry point runs.
pub struct CountingHasher {
    inner: Argon2Hasher,
    pub hashes: AtomicUsize,
    pub verifies: AtomicUsize,
}

impl CountingHasher {
    pub fn new() -> Self {
        Self {
            inner: Argon2Hasher::new(&cheap_password_config()).expect("hasher"),
            hashes: AtomicUsize::new(0),
            verifies: AtomicUsize::new(0),
        }
    }
}

impl PasswordHasher for CountingHasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        self.inner.hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(password, hash)
    }

    fn verify_absent(&self, password: &str) -> Result<(), HashError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        self.inner.verify_absent(password)
    }
}
