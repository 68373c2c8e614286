use std::future::Future;
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

use thiserror::Error;
use tonic::transport::Server;
use tracing::info;

use crate::auth::adapters::grpc::GrpcAuthService;
use crate::auth::adapters::memory::InMemoryStorage;
use crate::auth::domain::{App as Application, StorageError};
use crate::auth::password::{Argon2Hasher, HashError};
use crate::auth::Auth;
use crate::config::Settings;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid password hashing config: {0}")]
    Hasher(#[from] HashError),

    #[error("failed to seed app {id}: {source}")]
    SeedApp {
        id: i32,
        #[source]
        source: StorageError,
    },

    #[error("invalid listen address: {0}")]
    Addr(#[from] AddrParseError),

    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// Wired-up service: storage, auth domain and the gRPC listener settings.
pub struct App {
    settings: Settings,
    storage: Arc<InMemoryStorage>,
    auth: Arc<Auth>,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let storage = Arc::new(InMemoryStorage::new());
        for app in &settings.apps {
            storage
                .insert_app(Application {
                    id: app.id,
                    name: app.name.clone(),
                    secret: app.secret.clone(),
                })
                .map_err(|source| AppError::SeedApp { id: app.id, source })?;
        }

        let hasher = Arc::new(Argon2Hasher::new(&settings.auth.password)?);
        let auth = Arc::new(Auth::new(
            storage.clone(),
            storage.clone(),
            hasher,
            settings.auth.token_ttl(),
        ));

        info!(apps = settings.apps.len(), "auth service initialized");

        Ok(Self {
            settings,
            storage,
            auth,
        })
    }

    pub fn storage(&self) -> &Arc<InMemoryStorage> {
        &self.storage
    }

    pub fn auth(&self) -> &Arc<Auth> {
        &self.auth
    }

    pub fn addr(&self) -> Result<SocketAddr, AppError> {
        let addr = format!("{}:{}", self.settings.server.host, self.settings.server.port).parse()?;
        Ok(addr)
    }

    /// Serves gRPC until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = self.addr()?;

        let mut service = GrpcAuthService::new(self.auth);
        if let Some(timeout) = self.settings.server.timeout() {
            service = service.with_request_timeout(timeout);
        }

        info!(%addr, "grpc server started");

        Server::builder()
            .add_service(service.into_server())
            .serve_with_shutdown(addr, shutdown)
            .await?;

        info!("grpc server stopped");
        Ok(())
    }
}
