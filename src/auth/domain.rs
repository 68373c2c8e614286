use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::context::ContextError;
use crate::auth::password::HashError;
use crate::auth::token::TokenError;

#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub pass_hash: String,
    pub is_admin: bool,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("pass_hash", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// A calling application; its secret signs the tokens issued for it.
#[derive(Clone, PartialEq, Eq)]
pub struct App {
    pub id: i32,
    pub name: String,
    pub secret: String,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Fields signed into every issued token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub uid: i64,
    pub email: String,
    pub appid: i32,
    pub exp: i64,
}

/// Errors reported by storage providers. Callers match on the variant, never on the message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("record already exists")]
    AlreadyExists,

    #[error("record not found")]
    NotFound,

    #[error("storage error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{op}: user not found")]
    UserNotFound { op: &'static str },

    #[error("{op}: user already exists")]
    UserAlreadyExists { op: &'static str },

    #[error("{op}: invalid credentials")]
    InvalidCredentials { op: &'static str },

    #[error("{op}: request cancelled")]
    Cancelled { op: &'static str },

    #[error("{op}: deadline exceeded")]
    DeadlineExceeded { op: &'static str },

    #[error("{op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("{op}: {source}")]
    PasswordHash {
        op: &'static str,
        #[source]
        source: HashError,
    },

    #[error("{op}: {source}")]
    Token {
        op: &'static str,
        #[source]
        source: TokenError,
    },

    #[error("{op}: internal error: {message}")]
    Internal { op: &'static str, message: String },
}

impl AuthError {
    /// Name of the operation that produced the error, e.g. `auth.Login`.
    pub fn op(&self) -> &'static str {
        match self {
            Self::UserNotFound { op }
            | Self::UserAlreadyExists { op }
            | Self::InvalidCredentials { op }
            | Self::Cancelled { op }
            | Self::DeadlineExceeded { op }
            | Self::Storage { op, .. }
            | Self::PasswordHash { op, .. }
            | Self::Token { op, .. }
            | Self::Internal { op, .. } => op,
        }
    }

    pub(crate) fn from_context(op: &'static str, err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => Self::Cancelled { op },
            ContextError::DeadlineExceeded => Self::DeadlineExceeded { op },
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
