use argon2::password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::config::PasswordConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),

    #[error("malformed password hash: {0}")]
    MalformedHash(String),

    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// One-way salted password hashing. Implementations are CPU-bound and called from the blocking pool.
pub trait PasswordHasher: Send + Sync + 'static {
    /// パスワードからソルト付きの自己記述型ハッシュを生成
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// 不一致なら `Ok(false)`、ハッシュを解釈できない場合のみ `Err`
    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;

    /// 存在しないユーザー向けに `verify` と同等の計算コストを消費する（結果は常に不一致）
    fn verify_absent(&self, password: &str) -> Result<(), HashError> {
        self.hash(password).map(|_| ())
    }
}

/// Argon2id with configurable cost.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new(config: &PasswordConfig) -> Result<Self, HashError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| HashError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash).map_err(|e| HashError::MalformedHash(e.to_string()))?;

        // The digest comparison inside verify_password is constant-time.
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Hashing(e.to_string())),
        }
    }
}
