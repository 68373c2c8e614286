use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::auth::context::RequestContext;
use crate::auth::domain::{App, StorageError, User};
use crate::auth::ports::{AppProvider, UserProvider};

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    ids_by_email: HashMap<String, i64>,
    apps: HashMap<i32, App>,
    last_user_id: i64,
}

/// In-process store implementing both providers.
///
/// Writes are visible to every subsequent read. The lock is never held across an await point.
#[derive(Default)]
pub struct InMemoryStorage {
    tables: RwLock<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an application; used to seed storage at startup.
    pub fn insert_app(&self, app: App) -> Result<(), StorageError> {
        let mut tables = self.tables.write();
        if tables.apps.contains_key(&app.id) {
            return Err(StorageError::AlreadyExists);
        }
        tables.apps.insert(app.id, app);
        Ok(())
    }

    /// Administrative toggle of the admin flag; not reachable from the auth service.
    pub fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<(), StorageError> {
        let mut tables = self.tables.write();
        let user = tables.users.get_mut(&user_id).ok_or(StorageError::NotFound)?;
        user.is_admin = is_admin;
        Ok(())
    }

    pub fn user_count(&self) -> usize {
        self.tables.read().users.len()
    }
}

#[async_trait]
impl UserProvider for InMemoryStorage {
    async fn save_user(
        &self,
        _ctx: &RequestContext,
        email: &str,
        pass_hash: &str,
    ) -> Result<i64, StorageError> {
        let mut tables = self.tables.write();
        if tables.ids_by_email.contains_key(email) {
            return Err(StorageError::AlreadyExists);
        }

        tables.last_user_id += 1;
        let id = tables.last_user_id;
        tables.ids_by_email.insert(email.to_string(), id);
        tables.users.insert(
            id,
            User {
                id,
                email: email.to_string(),
                pass_hash: pass_hash.to_string(),
                is_admin: false,
            },
        );
        Ok(id)
    }

    async fn user(&self, _ctx: &RequestContext, email: &str) -> Result<User, StorageError> {
        let tables = self.tables.read();
        tables
            .ids_by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn is_admin(&self, _ctx: &RequestContext, user_id: i64) -> Result<bool, StorageError> {
        self.tables
            .read()
            .users
            .get(&user_id)
            .map(|user| user.is_admin)
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl AppProvider for InMemoryStorage {
    async fn app(&self, _ctx: &RequestContext, app_id: i32) -> Result<App, StorageError> {
        self.tables
            .read()
            .apps
            .get(&app_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}
