use std::sync::Arc;
use std::time::Duration;

use tonic::{Request, Response, Status};
use tracing::error;

use crate::auth::context::RequestContext;
use crate::auth::domain::AuthError;
use crate::auth::ports::AuthenticationPort;
use crate::generated::auth::auth_server::{Auth, AuthServer};
use crate::generated::auth::{
    IsAdminRequest, IsAdminResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse,
};

const EMPTY_APP_ID: i32 = 0;
const EMPTY_USER_ID: i64 = 0;

pub struct GrpcAuthService<T: AuthenticationPort> {
    auth_service: Arc<T>,
    request_timeout: Option<Duration>,
}

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials { .. } => Status::invalid_argument("invalid credentials"),
            AuthError::UserAlreadyExists { .. } => Status::already_exists("user already exists"),
            AuthError::UserNotFound { .. } => Status::not_found("user not found"),
            AuthError::Cancelled { .. } => Status::cancelled("request cancelled"),
            AuthError::DeadlineExceeded { .. } => Status::deadline_exceeded("deadline exceeded"),
            // 詳細はログのみに残し、呼び出し元には返さない
            _ => {
                error!(error = %err, "internal error");
                Status::internal("internal error")
            }
        }
    }
}

impl<T: AuthenticationPort> GrpcAuthService<T> {
    pub fn new(auth_service: Arc<T>) -> Self {
        Self {
            auth_service,
            request_timeout: None,
        }
    }

    /// Bounds every request handled by this service.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn context(&self) -> RequestContext {
        let ctx = RequestContext::background();
        match self.request_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

impl<T: AuthenticationPort + 'static> GrpcAuthService<T> {
    pub fn into_server(self) -> AuthServer<Self> {
        AuthServer::new(self)
    }
}

#[tonic::async_trait]
impl<T: AuthenticationPort + Send + Sync + 'static> Auth for GrpcAuthService<T> {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let req = request.into_inner();

        if req.email.is_empty() {
            return Err(Status::invalid_argument("email is required"));
        }
        if req.password.is_empty() {
            return Err(Status::invalid_argument("password is required"));
        }

        let user_id = self
            .auth_service
            .register_new_user(&self.context(), &req.email, &req.password)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(RegisterResponse { user_id }))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();

        if req.email.is_empty() {
            return Err(Status::invalid_argument("email is required"));
        }
        if req.password.is_empty() {
            return Err(Status::invalid_argument("password is required"));
        }
        if req.app_id == EMPTY_APP_ID {
            return Err(Status::invalid_argument("app_id is required"));
        }

        let token = self
            .auth_service
            .login(&self.context(), &req.email, &req.password, req.app_id)
            .await
            .map_err(|err| match err {
                // Unknown users look the same as wrong passwords from outside.
                AuthError::UserNotFound { .. } => Status::invalid_argument("invalid credentials"),
                other => Status::from(other),
            })?;

        Ok(Response::new(LoginResponse { token }))
    }

    async fn is_admin(
        &self,
        request: Request<IsAdminRequest>,
    ) -> Result<Response<IsAdminResponse>, Status> {
        let req = request.into_inner();

        if req.user_id == EMPTY_USER_ID {
            return Err(Status::invalid_argument("user_id is required"));
        }

        let is_admin = self
            .auth_service
            .is_admin(&self.context(), req.user_id)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(IsAdminResponse { is_admin }))
    }
}
