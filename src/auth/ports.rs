use crate::auth::context::RequestContext;
use crate::auth::domain::{App, AuthResult, StorageError, User};
use async_trait::async_trait;

#[async_trait]
pub trait UserProvider: Send + Sync {
    /// 新規ユーザーを保存し、採番された ID を返す
    async fn save_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        pass_hash: &str,
    ) -> Result<i64, StorageError>;

    /// メールアドレスでユーザーを取得
    async fn user(&self, ctx: &RequestContext, email: &str) -> Result<User, StorageError>;

    /// 管理者フラグを取得
    async fn is_admin(&self, ctx: &RequestContext, user_id: i64) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait AppProvider: Send + Sync {
    /// ID でアプリケーションを取得
    async fn app(&self, ctx: &RequestContext, app_id: i32) -> Result<App, StorageError>;
}

#[async_trait]
pub trait AuthenticationPort: Send + Sync {
    /// メールアドレスとパスワードを検証し、アプリ向けのトークンを発行
    async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> AuthResult<String>;

    /// パスワードをハッシュ化して新規ユーザーを登録
    async fn register_new_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> AuthResult<i64>;

    /// ユーザーが管理者かどうかを確認
    async fn is_admin(&self, ctx: &RequestContext, user_id: i64) -> AuthResult<bool>;
}
