use std::sync::Arc;

use sso_auth::auth::adapters::grpc::GrpcAuthService;
use sso_auth::auth::context::RequestContext;
use sso_auth::auth::domain::{AuthError, AuthResult, StorageError};
use sso_auth::auth::ports::AuthenticationPort;
use sso_auth::generated::auth::auth_server::Auth;
use sso_auth::generated::auth::{IsAdminRequest, LoginRequest, RegisterRequest};
use tokio::sync::Mutex;
use tonic::{Code, Request, Status};

#[derive(Default)]
struct MockAuthService {
    login_response: Mutex<Option<AuthResult<String>>>,
    register_response: Mutex<Option<AuthResult<i64>>>,
    is_admin_response: Mutex<Option<AuthResult<bool>>>,
    calls: Mutex<u32>,
}

impl MockAuthService {
    async fn set_login_response(&self, response: AuthResult<String>) {
        *self.login_response.lock().await = Some(response);
    }

    async fn set_register_response(&self, response: AuthResult<i64>) {
        *self.register_response.lock().await = Some(response);
    }

    async fn set_is_admin_response(&self, response: AuthResult<bool>) {
        *self.is_admin_response.lock().await = Some(response);
    }

    async fn calls(&self) -> u32 {
        *self.calls.lock().await
    }
}

fn unset() -> AuthError {
    AuthError::Internal {
        op: "mock",
        message: "no response set".to_string(),
    }
}

#[tonic::async_trait]
impl AuthenticationPort for MockAuthService {
    async fn login(
        &self,
        _ctx: &RequestContext,
        _email: &str,
        _password: &str,
        _app_id: i32,
    ) -> AuthResult<String> {
        *self.calls.lock().await += 1;
        self.login_response.lock().await.take().unwrap_or_else(|| Err(unset()))
    }

    async fn register_new_user(
        &self,
        _ctx: &RequestContext,
        _email: &str,
        _password: &str,
    ) -> AuthResult<i64> {
        *self.calls.lock().await += 1;
        self.register_response.lock().await.take().unwrap_or_else(|| Err(unset()))
    }

    async fn is_admin(&self, _ctx: &RequestContext, _user_id: i64) -> AuthResult<bool> {
        *self.calls.lock().await += 1;
        self.is_admin_response.lock().await.take().unwrap_or_else(|| Err(unset()))
    }
}

fn service() -> (Arc<MockAuthService>, GrpcAuthService<MockAuthService>) {
    let mock = Arc::new(MockAuthService::default());
    (mock.clone(), GrpcAuthService::new(mock))
}

fn login_request(email: &str, password: &str, app_id: i32) -> Request<LoginRequest> {
    Request::new(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
        app_id,
    })
}

#[tokio::test]
async fn login_success_returns_token() {
    let (mock, grpc) = service();
    mock.set_login_response(Ok("signed.jwt.token".to_string())).await;

    let response = grpc.login(login_request("a@b.com", "pw", 1)).await.unwrap();
    assert_eq!(response.into_inner().token, "signed.jwt.token");
}

#[tokio::test]
async fn login_rejects_missing_fields_without_calling_service() {
    let (mock, grpc) = service();

    for request in [
        login_request("", "pw", 1),
        login_request("a@b.com", "", 1),
        login_request("a@b.com", "pw", 0),
    ] {
        let status = grpc.login(request).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }
    assert_eq!(mock.calls().await, 0);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (mock, grpc) = service();

    let mut messages = Vec::new();
    for err in [
        AuthError::InvalidCredentials { op: "auth.Login" },
        AuthError::UserNotFound { op: "auth.Login" },
    ] {
        mock.set_login_response(Err(err)).await;
        let status = grpc.login(login_request("a@b.com", "pw", 1)).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        messages.push(status.message().to_string());
    }
    assert_eq!(messages[0], messages[1]);
}

#[tokio::test]
async fn login_internal_error_hides_details() {
    let (mock, grpc) = service();
    mock.set_login_response(Err(AuthError::Storage {
        op: "auth.Login",
        source: StorageError::Other("password column corrupted".to_string()),
    }))
    .await;

    let status = grpc.login(login_request("a@b.com", "pw", 1)).await.unwrap_err();
    assert_eq!(status.code(), Code::Internal);
    assert!(!status.message().contains("corrupted"));
}

#[tokio::test]
async fn register_maps_outcomes() {
    let (mock, grpc) = service();

    mock.set_register_response(Ok(7)).await;
    let response = grpc
        .register(Request::new(RegisterRequest {
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
        }))
        .await
        .unwrap();
    assert_eq!(response.into_inner().user_id, 7);

    mock.set_register_response(Err(AuthError::UserAlreadyExists {
        op: "auth.RegisterNewUser",
    }))
    .await;
    let status = grpc
        .register(Request::new(RegisterRequest {
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::AlreadyExists);

    let status = grpc
        .register(Request::new(RegisterRequest {
            email: String::new(),
            password: "pw".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn is_admin_maps_outcomes() {
    let (mock, grpc) = service();

    mock.set_is_admin_response(Ok(true)).await;
    let response = grpc
        .is_admin(Request::new(IsAdminRequest { user_id: 3 }))
        .await
        .unwrap();
    assert!(response.into_inner().is_admin);

    mock.set_is_admin_response(Err(AuthError::UserNotFound { op: "auth.IsAdmin" }))
        .await;
    let status = grpc
        .is_admin(Request::new(IsAdminRequest { user_id: 3 }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = grpc
        .is_admin(Request::new(IsAdminRequest { user_id: 0 }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[test]
fn auth_error_to_status_conversion() {
    assert_eq!(
        Status::from(AuthError::InvalidCredentials { op: "auth.Login" }).code(),
        Code::InvalidArgument
    );
    assert_eq!(
        Status::from(AuthError::UserAlreadyExists { op: "auth.RegisterNewUser" }).code(),
        Code::AlreadyExists
    );
    assert_eq!(
        Status::from(AuthError::UserNotFound { op: "auth.IsAdmin" }).code(),
        Code::NotFound
    );
    assert_eq!(
        Status::from(AuthError::Cancelled { op: "auth.Login" }).code(),
        Code::Cancelled
    );
    assert_eq!(
        Status::from(AuthError::DeadlineExceeded { op: "auth.Login" }).code(),
        Code::DeadlineExceeded
    );

    let internal = Status::from(AuthError::Internal {
        op: "auth.Login",
        message: "join error".to_string(),
    });
    assert_eq!(internal.code(), Code::Internal);
    assert_eq!(internal.message(), "internal error");
}
