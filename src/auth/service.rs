use std::sync::Arc;

use async_trait::async_trait;
use time::Duration;
use tokio::task;
use tracing::{error, info, instrument, warn};

use crate::auth::context::{ContextError, RequestContext};
use crate::auth::domain::{AuthError, AuthResult, StorageError};
use crate::auth::password::{HashError, PasswordHasher};
use crate::auth::ports::{AppProvider, AuthenticationPort, UserProvider};
use crate::auth::token;

const OP_LOGIN: &str = "auth.Login";
const OP_REGISTER: &str = "auth.RegisterNewUser";
const OP_IS_ADMIN: &str = "auth.IsAdmin";

fn aborted(op: &'static str, err: ContextError) -> AuthError {
    warn!(error = %err, "request aborted");
    AuthError::from_context(op, err)
}

/// Credential verification, registration and admin lookup over pluggable providers.
pub struct Auth {
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    hasher: Arc<dyn PasswordHasher>,
    token_ttl: Duration,
}

impl Auth {
    pub fn new(
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        hasher: Arc<dyn PasswordHasher>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_provider,
            app_provider,
            hasher,
            token_ttl,
        }
    }

    /// Runs a hasher call on the blocking pool, bounded by `ctx`.
    async fn run_hasher<T, F>(&self, ctx: &RequestContext, op: &'static str, f: F) -> AuthResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn PasswordHasher) -> Result<T, HashError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        let joined = ctx
            .run(task::spawn_blocking(move || f(hasher.as_ref())))
            .await
            .map_err(|e| aborted(op, e))?;

        match joined {
            Ok(result) => result.map_err(|source| {
                error!(error = %source, "password hashing failed");
                AuthError::PasswordHash { op, source }
            }),
            Err(e) => {
                error!(error = %e, "password hashing task failed");
                Err(AuthError::Internal {
                    op,
                    message: e.to_string(),
                })
            }
        }
    }

    #[instrument(name = "login", skip_all, fields(operation = OP_LOGIN, email = %email, app_id = app_id))]
    async fn login_inner(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> AuthResult<String> {
        info!("user is logging in");

        let user = match ctx
            .run(self.user_provider.user(ctx, email))
            .await
            .map_err(|e| aborted(OP_LOGIN, e))?
        {
            Ok(user) => user,
            Err(StorageError::NotFound) => {
                warn!("user not found");
                // Same hashing cost as a wrong password so response time does not reveal the email.
                let password = password.to_owned();
                self.run_hasher(ctx, OP_LOGIN, move |hasher| hasher.verify_absent(&password))
                    .await?;
                return Err(AuthError::UserNotFound { op: OP_LOGIN });
            }
            Err(e) => {
                error!(error = %e, "failed to get user");
                return Err(AuthError::Storage {
                    op: OP_LOGIN,
                    source: e,
                });
            }
        };

        let password = password.to_owned();
        let pass_hash = user.pass_hash.clone();
        let verified = self
            .run_hasher(ctx, OP_LOGIN, move |hasher| hasher.verify(&password, &pass_hash))
            .await?;
        if !verified {
            warn!(user_id = user.id, "invalid credentials");
            return Err(AuthError::InvalidCredentials { op: OP_LOGIN });
        }

        let app = match ctx
            .run(self.app_provider.app(ctx, app_id))
            .await
            .map_err(|e| aborted(OP_LOGIN, e))?
        {
            Ok(app) => app,
            Err(StorageError::NotFound) => {
                // Reported as bad credentials so app ids cannot be probed.
                warn!("app not found");
                return Err(AuthError::InvalidCredentials { op: OP_LOGIN });
            }
            Err(e) => {
                error!(error = %e, "failed to get app");
                return Err(AuthError::Storage {
                    op: OP_LOGIN,
                    source: e,
                });
            }
        };

        let token = token::new_token(&user, &app, self.token_ttl).map_err(|source| {
            error!(error = %source, "failed to create token");
            AuthError::Token {
                op: OP_LOGIN,
                source,
            }
        })?;

        info!(user_id = user.id, "user logged in");
        Ok(token)
    }

    #[instrument(name = "register", skip_all, fields(operation = OP_REGISTER, email = %email))]
    async fn register_inner(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> AuthResult<i64> {
        info!("registering new user");

        let password = password.to_owned();
        let pass_hash = self
            .run_hasher(ctx, OP_REGISTER, move |hasher| hasher.hash(&password))
            .await?;

        let id = match ctx
            .run(self.user_provider.save_user(ctx, email, &pass_hash))
            .await
            .map_err(|e| aborted(OP_REGISTER, e))?
        {
            Ok(id) => id,
            Err(StorageError::AlreadyExists) => {
                warn!("user already exists");
                return Err(AuthError::UserAlreadyExists { op: OP_REGISTER });
            }
            Err(e) => {
                error!(error = %e, "failed to save user");
                return Err(AuthError::Storage {
                    op: OP_REGISTER,
                    source: e,
                });
            }
        };

        info!(user_id = id, "user registered");
        Ok(id)
    }

    #[instrument(name = "is_admin", skip_all, fields(operation = OP_IS_ADMIN, user_id = user_id))]
    async fn is_admin_inner(&self, ctx: &RequestContext, user_id: i64) -> AuthResult<bool> {
        info!("checking if user is admin");

        let is_admin = match ctx
            .run(self.user_provider.is_admin(ctx, user_id))
            .await
            .map_err(|e| aborted(OP_IS_ADMIN, e))?
        {
            Ok(is_admin) => is_admin,
            Err(StorageError::NotFound) => {
                warn!("user not found");
                return Err(AuthError::UserNotFound { op: OP_IS_ADMIN });
            }
            Err(e) => {
                error!(error = %e, "failed to check if user is admin");
                return Err(AuthError::Storage {
                    op: OP_IS_ADMIN,
                    source: e,
                });
            }
        };

        info!(is_admin, "checked if user is admin");
        Ok(is_admin)
    }
}

#[async_trait]
impl AuthenticationPort for Auth {
    async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> AuthResult<String> {
        self.login_inner(ctx, email, password, app_id).await
    }

    async fn register_new_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> AuthResult<i64> {
        self.register_inner(ctx, email, password).await
    }

    async fn is_admin(&self, ctx: &RequestContext, user_id: i64) -> AuthResult<bool> {
        self.is_admin_inner(ctx, user_id).await
    }
}
